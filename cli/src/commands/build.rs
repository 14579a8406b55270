// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use aegis_console_core::application::deployment::DeploymentRequest;
use aegis_console_core::domain::build::BuildPhase;
use aegis_console_sdk::ConsoleClient;

#[derive(Subcommand)]
pub enum BuildCommand {
    /// Follow a build until it completes
    Watch {
        /// Namespace of the build run
        #[arg(value_name = "NAMESPACE")]
        namespace: String,

        /// Name of the build run
        #[arg(value_name = "NAME")]
        name: String,

        /// Deploy this manifest once the build succeeds
        #[arg(long, value_name = "MANIFEST")]
        deploy: Option<PathBuf>,

        /// Seconds between status polls
        #[arg(long, default_value = "2")]
        interval: u64,

        /// Polls before giving up
        #[arg(long, default_value = "150")]
        max_attempts: u32,
    },
}

pub async fn handle_command(
    command: BuildCommand,
    server: &str,
    api_key: Option<&str>,
) -> Result<()> {
    let mut client = ConsoleClient::new(server);
    if let Some(key) = api_key {
        client = client.with_api_key(key);
    }

    match command {
        BuildCommand::Watch {
            namespace,
            name,
            deploy,
            interval,
            max_attempts,
        } => watch(namespace, name, deploy, interval, max_attempts, client).await,
    }
}

async fn watch(
    namespace: String,
    name: String,
    deploy: Option<PathBuf>,
    interval: u64,
    max_attempts: u32,
    client: ConsoleClient,
) -> Result<()> {
    println!("Watching build {}/{}", namespace, name.bold());

    let mut last_phase: Option<BuildPhase> = None;

    for attempt in 1..=max_attempts {
        let status = client.get_build_run(&namespace, &name).await?;

        if last_phase != Some(status.phase) {
            last_phase = Some(status.phase);
            let line = format!("  {} {}", "→".bold(), status.phase);
            match status.phase {
                BuildPhase::Succeeded => println!("{}", line.green()),
                BuildPhase::Failed => println!("{}", line.red()),
                _ => println!("{line}"),
            }
        }

        match status.phase {
            BuildPhase::Succeeded => {
                if let Some(digest) = &status.image_digest {
                    println!("  image: {digest}");
                }
                if let Some(manifest) = deploy {
                    return finalize(manifest, client).await;
                }
                return Ok(());
            }
            BuildPhase::Failed => {
                bail!(
                    "Build {namespace}/{name} failed: {}",
                    status.reason.as_deref().unwrap_or("no reason reported")
                );
            }
            _ => {}
        }

        if attempt < max_attempts {
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    }

    bail!("Timed out waiting for build {namespace}/{name}")
}

async fn finalize(manifest: PathBuf, client: ConsoleClient) -> Result<()> {
    let manifest_content = std::fs::read_to_string(&manifest)
        .with_context(|| format!("Failed to read manifest: {:?}", manifest))?;

    let request: DeploymentRequest =
        serde_yaml::from_str(&manifest_content).context("Failed to parse manifest YAML")?;

    println!("Build succeeded, deploying {}", request.name.bold());

    let receipt = client.deploy_agent(&request).await?;

    println!(
        "{}",
        format!("✓ Agent {} deployed", receipt.resource.metadata.name).green()
    );

    Ok(())
}

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use aegis_console_core::application::deployment::DeploymentRequest;
use aegis_console_core::application::env_import::EnvImportService;
use aegis_console_core::infrastructure::manifest::{merge_fragment, ManifestFragmentBuilder};
use aegis_console_sdk::ConsoleClient;

#[derive(Subcommand)]
pub enum AgentCommand {
    /// Deploy an agent from a manifest file
    Deploy {
        /// Path to a deployment manifest YAML file
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Merge variables from a .env file into the manifest
        #[arg(long, value_name = "FILE")]
        env_file: Option<PathBuf>,
    },
}

pub async fn handle_command(
    command: AgentCommand,
    server: &str,
    api_key: Option<&str>,
) -> Result<()> {
    let mut client = ConsoleClient::new(server);
    if let Some(key) = api_key {
        client = client.with_api_key(key);
    }

    match command {
        AgentCommand::Deploy { manifest, env_file } => deploy(manifest, env_file, client).await,
    }
}

async fn deploy(manifest: PathBuf, env_file: Option<PathBuf>, client: ConsoleClient) -> Result<()> {
    let manifest_content = std::fs::read_to_string(&manifest)
        .with_context(|| format!("Failed to read manifest: {:?}", manifest))?;

    let mut request: DeploymentRequest =
        serde_yaml::from_str(&manifest_content).context("Failed to parse manifest YAML")?;

    if let Some(path) = env_file {
        let result = EnvImportService::new().import_file(&path)?;

        for warning in &result.warnings {
            println!("{}", format!("⚠ {warning}").yellow());
        }

        merge_fragment(
            &mut request.env,
            ManifestFragmentBuilder::build(&result.env_vars),
        );
    }

    println!("Deploying agent: {}", request.name.bold());

    let receipt = client.deploy_agent(&request).await?;

    println!(
        "{}",
        format!(
            "✓ Agent {}/{} deployed ({})",
            receipt.resource.metadata.namespace,
            receipt.resource.metadata.name,
            receipt.deployment_id
        )
        .green()
    );

    Ok(())
}

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use aegis_console_core::application::env_import::EnvImportService;
use aegis_console_core::domain::env::ContainerEnvVar;
use aegis_console_core::infrastructure::manifest::ManifestFragmentBuilder;
use aegis_console_core::infrastructure::remote_env::RemoteEnvSource;

#[derive(Subcommand)]
pub enum EnvCommand {
    /// Preview what an env file would contribute to a deployment
    Preview {
        /// Path to a .env file
        #[arg(value_name = "FILE", conflicts_with = "url", required_unless_present = "url")]
        file: Option<PathBuf>,

        /// Fetch the env file from a URL instead
        #[arg(long)]
        url: Option<String>,

        /// Print the manifest fragment as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_command(command: EnvCommand) -> Result<()> {
    match command {
        EnvCommand::Preview { file, url, json } => preview(file, url, json).await,
    }
}

async fn preview(file: Option<PathBuf>, url: Option<String>, json: bool) -> Result<()> {
    let service = EnvImportService::new();

    let result = match (file, url) {
        (Some(path), _) => service.import_file(&path)?,
        (None, Some(url)) => {
            let source = RemoteEnvSource::new();
            service.import_url(&source, &url).await?
        }
        (None, None) => unreachable!("clap enforces file or url"),
    };

    for warning in &result.warnings {
        println!("{}", format!("⚠ {warning}").yellow());
    }

    if json {
        let fragment = ManifestFragmentBuilder::to_json(&result.env_vars);
        println!("{}", serde_json::to_string_pretty(&fragment)?);
        return Ok(());
    }

    if result.env_vars.is_empty() {
        println!("{}", "No environment variables found".yellow());
        return Ok(());
    }

    let fragment = ManifestFragmentBuilder::build(&result.env_vars);
    println!("{:<32} {}", "NAME", "SOURCE");
    for entry in &fragment {
        println!("{:<32} {}", entry.name.bold(), describe_source(entry));
    }

    Ok(())
}

/// Human-readable description of where an env entry's value comes from.
fn describe_source(entry: &ContainerEnvVar) -> String {
    if let Some(value) = &entry.value {
        return format!("literal: {value}");
    }
    if let Some(source) = &entry.value_from {
        if let Some(selector) = &source.secret_key_ref {
            return format!("secret {}/{}", selector.name, selector.key);
        }
        if let Some(selector) = &source.config_map_key_ref {
            return format!("configMap {}/{}", selector.name, selector.key);
        }
    }
    "unset".to_string()
}

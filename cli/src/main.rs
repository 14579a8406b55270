// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # AEGIS Console CLI
//!
//! The `aegis-console` binary serves the agent platform console API and
//! provides operator commands against a running console.
//!
//! ## Commands
//!
//! - `aegis-console serve` - Run the console API in front of a cluster gateway
//! - `aegis-console env preview` - Preview an env-file import
//! - `aegis-console agent deploy` - Deploy an agent workload
//! - `aegis-console build watch` - Follow a build and optionally finalize it

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{AgentCommand, BuildCommand, EnvCommand};

/// AEGIS Console - preview, deploy, and watch agent workloads
#[derive(Parser)]
#[command(name = "aegis-console")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Console API base URL
    #[arg(
        long,
        global = true,
        env = "AEGIS_CONSOLE_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    server: String,

    /// API key for the console
    #[arg(long, global = true, env = "AEGIS_CONSOLE_API_KEY")]
    api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "AEGIS_CONSOLE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the console API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Bind port
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Cluster gateway base URL
        #[arg(long, env = "AEGIS_GATEWAY_URL")]
        gateway_url: String,

        /// Cluster gateway bearer token
        #[arg(long, env = "AEGIS_GATEWAY_TOKEN")]
        gateway_token: Option<String>,
    },

    /// Environment variable imports
    #[command(name = "env")]
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },

    /// Agent workload operations
    #[command(name = "agent")]
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },

    /// Build operations
    #[command(name = "build")]
    Build {
        #[command(subcommand)]
        command: BuildCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cli.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            gateway_url,
            gateway_token,
        } => commands::serve::run(host, port, gateway_url, gateway_token).await,
        Commands::Env { command } => commands::env::handle_command(command).await,
        Commands::Agent { command } => {
            commands::agent::handle_command(command, &cli.server, cli.api_key.as_deref()).await
        }
        Commands::Build { command } => {
            commands::build::handle_command(command, &cli.server, cli.api_key.as_deref()).await
        }
    }
}

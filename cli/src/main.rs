// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Murmuration CLI
//!
//! The `murm` binary runs swarms in-process against a Murmuration engine.
//!
//! ## Commands
//!
//! - `murm demo` - Walk the dependency scenario on a mesh swarm
//! - `murm recommend --user U` - Run a recommendation pipeline through the worker
//! - `murm config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use murmuration_engine::domain::engine_config::EngineConfigManifest;

mod commands;

use commands::{ConfigCommand, RecommendArgs};

/// Murmuration - swarm task orchestration for recommendation agents
#[derive(Parser)]
#[command(name = "murm")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "MURMURATION_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the mesh dependency scenario step by step
    #[command(name = "demo")]
    Demo,

    /// Run a recommendation pipeline through the swarm worker
    #[command(name = "recommend")]
    Recommend(RecommendArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { command }) => {
            // Config commands must work even when the discovered file is broken.
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Demo) => {
            let manifest = load_manifest(cli.config, cli.log_level.as_deref())?;
            commands::demo::run(&manifest)
        }
        Some(Commands::Recommend(args)) => {
            let manifest = load_manifest(cli.config, cli.log_level.as_deref())?;
            commands::recommend::run(args, &manifest).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Load and validate the engine manifest, then initialize logging from it.
fn load_manifest(path: Option<PathBuf>, log_level: Option<&str>) -> Result<EngineConfigManifest> {
    let manifest =
        EngineConfigManifest::load_or_default(path).context("Failed to load configuration")?;
    manifest
        .validate()
        .context("Configuration validation failed")?;

    let logging = &manifest.spec.observability.logging;
    init_logging(log_level.unwrap_or(&logging.level), &logging.format)?;
    Ok(manifest)
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    // Logs go to stderr; stdout carries command output.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        _ => builder.compact().init(),
    }

    Ok(())
}

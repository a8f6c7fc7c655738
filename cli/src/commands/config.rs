// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use murmuration_engine::domain::engine_config::EngineConfigManifest;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./murmuration-config.yaml)
        #[arg(short, long, default_value = "./murmuration-config.yaml")]
        output: PathBuf,

        /// Prefix the file with a comment block describing each setting
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(&output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = EngineConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. MURMURATION_CONFIG_PATH: {}",
            std::env::var("MURMURATION_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./murmuration-config.yaml");
        println!("  4. ~/.murmuration/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Engine:".bold());
    println!("  Name: {}", config.metadata.name);
    if let Some(version) = &config.metadata.version {
        println!("  Version: {}", version);
    }
    println!();

    let defaults = &config.spec.defaults;
    println!("{}", "Swarm Defaults:".bold());
    println!("  Topology: {}", defaults.topology);
    println!("  Max agents: {}", defaults.max_agents);
    println!();

    let scheduling = &config.spec.scheduling;
    println!("{}", "Scheduling:".bold());
    println!("  Auto-assign: {}", scheduling.auto_assign);
    println!("  Star hub role: {}", scheduling.star_hub_role);
    println!("  Starter roster:");
    for role in &scheduling.starter_roster {
        println!("    - {}", role);
    }
    println!();

    println!("{}", "Observability:".bold());
    println!("  Event bus capacity: {}", config.spec.event_bus.capacity);
    println!(
        "  Logging: {} ({})",
        config.spec.observability.logging.level, config.spec.observability.logging.format
    );
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = EngineConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

const EXAMPLES_HEADER: &str = "\
# Murmuration engine configuration
#
# spec.defaults          topology (mesh | hierarchical | ring | star) and max_agents for new swarms
# spec.scheduling        auto_assign runs a scheduling pass after every create/complete/fail/spawn;
#                        star_hub_role gates star swarms; starter_roster seeds every new swarm
# spec.event_bus         capacity of the in-memory event channel
# spec.observability     logging level and format (text | json)
#
# Environment overrides: MURMURATION_TOPOLOGY, MURMURATION_MAX_AGENTS,
# MURMURATION_AUTO_ASSIGN, MURMURATION_LOG_LEVEL
";

async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    let yaml = EngineConfigManifest::default()
        .to_yaml_string()
        .context("Failed to render default configuration")?;
    let sample = if with_examples {
        format!("{EXAMPLES_HEADER}\n{yaml}")
    } else {
        yaml
    };

    std::fs::write(output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_config_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("murmuration-config.yaml");

        generate(&path, true).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Murmuration engine configuration"));
        let manifest = EngineConfigManifest::from_yaml_file(&path).unwrap();
        manifest.validate().unwrap();
        validate(Some(path)).await.unwrap();
    }
}

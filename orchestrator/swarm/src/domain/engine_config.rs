// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Engine Configuration Types
//
// Defines the configuration schema for a Murmuration engine, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Defaults for new swarms (topology, capacity)
// - Scheduling policy (automatic triggers, star hub role, starter roster)
// - Event bus sizing and observability settings

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::agent::AgentRole;
use crate::domain::scheduler::SchedulerPolicy;
use crate::domain::swarm::Topology;

pub const API_VERSION: &str = "murmuration/v1";
pub const KIND: &str = "EngineConfig";

/// Top-level Kubernetes-style engine configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfigManifest {
    /// API version (must be "murmuration/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "EngineConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: EngineConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable engine name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfigSpec {
    #[serde(default)]
    pub defaults: SwarmDefaults,

    #[serde(default)]
    pub scheduling: SchedulingConfig,

    #[serde(default)]
    pub event_bus: EventBusConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Used when a caller creates a swarm without explicit arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmDefaults {
    #[serde(default = "default_topology")]
    pub topology: Topology,

    #[serde(default = "default_max_agents")]
    pub max_agents: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Run an assignment pass after task creation, completion, failure and agent spawn
    #[serde(default)]
    pub auto_assign: bool,

    /// Hub role of star-topology swarms
    #[serde(default = "default_hub_role")]
    pub star_hub_role: AgentRole,

    /// Agents seeded into every new swarm, truncated to its capacity
    #[serde(default = "default_starter_roster")]
    pub starter_roster: Vec<AgentRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBusConfig {
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_topology() -> Topology {
    Topology::Mesh
}

fn default_max_agents() -> usize {
    8
}

fn default_hub_role() -> AgentRole {
    AgentRole::ContentAnalyzer
}

fn default_starter_roster() -> Vec<AgentRole> {
    vec![
        AgentRole::ContentAnalyzer,
        AgentRole::RecommendationGenerator,
        AgentRole::QualityAssessor,
    ]
}

fn default_event_capacity() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for SwarmDefaults {
    fn default() -> Self {
        Self {
            topology: default_topology(),
            max_agents: default_max_agents(),
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            auto_assign: false,
            star_hub_role: default_hub_role(),
            starter_roster: default_starter_roster(),
        }
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for EngineConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "murmuration".to_string(),
                version: Some("1.0.0".to_string()),
            },
            spec: EngineConfigSpec::default(),
        }
    }
}

impl SchedulingConfig {
    pub fn policy(&self) -> SchedulerPolicy {
        SchedulerPolicy {
            hub_role: self.star_hub_role,
        }
    }
}

impl EngineConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml).context("Invalid engine configuration YAML")?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. MURMURATION_CONFIG_PATH environment variable
    /// 2. ./murmuration-config.yaml (working directory)
    /// 3. ~/.murmuration/config.yaml (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("MURMURATION_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./murmuration-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".murmuration").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // An explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::debug!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MURMURATION_TOPOLOGY") {
            match val.parse::<Topology>() {
                Ok(topology) => {
                    tracing::info!("Environment override: MURMURATION_TOPOLOGY={}", topology);
                    self.spec.defaults.topology = topology;
                }
                Err(e) => tracing::warn!("Ignoring MURMURATION_TOPOLOGY: {}", e),
            }
        }

        if let Ok(val) = std::env::var("MURMURATION_MAX_AGENTS") {
            match val.parse::<usize>() {
                Ok(max_agents) => {
                    tracing::info!("Environment override: MURMURATION_MAX_AGENTS={}", max_agents);
                    self.spec.defaults.max_agents = max_agents;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for MURMURATION_MAX_AGENTS: '{}'. Expected a number. Ignoring.",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("MURMURATION_AUTO_ASSIGN") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => {
                    tracing::info!("Environment override: MURMURATION_AUTO_ASSIGN=true");
                    self.spec.scheduling.auto_assign = true;
                }
                "false" | "0" | "no" | "off" => {
                    tracing::info!("Environment override: MURMURATION_AUTO_ASSIGN=false");
                    self.spec.scheduling.auto_assign = false;
                }
                _ => tracing::warn!(
                    "Invalid value for MURMURATION_AUTO_ASSIGN: '{}'. Expected true/false. Ignoring.",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("MURMURATION_LOG_LEVEL") {
            self.spec.observability.logging.level = val;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            bail!(
                "Unsupported apiVersion '{}' (expected '{}')",
                self.api_version,
                API_VERSION
            );
        }
        if self.kind != KIND {
            bail!("Unsupported kind '{}' (expected '{}')", self.kind, KIND);
        }
        if self.metadata.name.trim().is_empty() {
            bail!("metadata.name must not be empty");
        }
        if self.spec.defaults.max_agents < 1 {
            bail!("spec.defaults.max_agents must be at least 1");
        }
        if self.spec.event_bus.capacity == 0 {
            bail!("spec.event_bus.capacity must be greater than 0");
        }
        if self.spec.scheduling.starter_roster.is_empty() {
            bail!("spec.scheduling.starter_roster must list at least one role");
        }
        let scheduling = &self.spec.scheduling;
        if !scheduling.starter_roster.contains(&scheduling.star_hub_role) {
            bail!(
                "spec.scheduling.star_hub_role '{}' must appear in spec.scheduling.starter_roster, \
                 otherwise star swarms never assign work",
                scheduling.star_hub_role
            );
        }
        match self.spec.observability.logging.format.as_str() {
            "json" | "text" => Ok(()),
            other => bail!("Unsupported log format '{}' (expected json or text)", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = EngineConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, KIND);
        assert_eq!(manifest.spec.defaults.topology, Topology::Mesh);
        assert!(!manifest.spec.scheduling.auto_assign);
        assert_eq!(manifest.spec.scheduling.starter_roster.len(), 3);
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_minimal_yaml_fills_defaults() {
        let yaml = r#"
apiVersion: murmuration/v1
kind: EngineConfig
metadata:
  name: recs-prod
spec:
  defaults:
    topology: star
  scheduling:
    auto_assign: true
    star_hub_role: quality_assessor
"#;
        let manifest = EngineConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.metadata.name, "recs-prod");
        assert_eq!(manifest.spec.defaults.topology, Topology::Star);
        assert_eq!(manifest.spec.defaults.max_agents, 8);
        assert!(manifest.spec.scheduling.auto_assign);
        assert_eq!(manifest.spec.scheduling.policy().hub_role, AgentRole::QualityAssessor);
        assert_eq!(manifest.spec.event_bus.capacity, 1000);
        assert_eq!(manifest.spec.observability.logging.level, "info");
    }

    #[test]
    fn test_unknown_topology_is_a_parse_error() {
        let yaml = "apiVersion: murmuration/v1\nkind: EngineConfig\nmetadata:\n  name: x\nspec:\n  defaults:\n    topology: torus\n";
        assert!(EngineConfigManifest::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_validation() {
        let mut manifest = EngineConfigManifest::default();

        manifest.api_version = "v0".to_string();
        assert!(manifest.validate().is_err());
        manifest.api_version = API_VERSION.to_string();

        manifest.spec.defaults.max_agents = 0;
        assert!(manifest.validate().is_err());
        manifest.spec.defaults.max_agents = 4;

        manifest.spec.scheduling.starter_roster.clear();
        assert!(manifest.validate().is_err());
        manifest.spec.scheduling.starter_roster.push(AgentRole::CacheManager);

        // The star hub must be staffed by the roster.
        let err = manifest.validate().unwrap_err();
        assert!(err.to_string().contains("star_hub_role"));
        manifest.spec.scheduling.star_hub_role = AgentRole::CacheManager;

        manifest.spec.observability.logging.format = "xml".to_string();
        assert!(manifest.validate().is_err());
        manifest.spec.observability.logging.format = "json".to_string();

        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip_preserves_roster() {
        let mut manifest = EngineConfigManifest::default();
        manifest.spec.scheduling.starter_roster = vec![AgentRole::TrendTracker];
        let yaml = manifest.to_yaml_string().unwrap();
        assert!(yaml.contains("trend_tracker"));
        let parsed = EngineConfigManifest::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.spec.scheduling.starter_roster, vec![AgentRole::TrendTracker]);
    }
}

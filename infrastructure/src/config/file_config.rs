//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the config file. They are
//! deserialized directly and converted into domain/application types after
//! validation.
//!
//! Example configuration:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:9380/api/v1/agents"
//! token = "ragflow-xyz"
//! timeout_seconds = 120
//!
//! [api.agents]
//! general = "c9b1f0..."
//! host = "a31e77..."
//!
//! [[panel.experts]]
//! key = "general"
//! name = "General Geology Expert"
//!
//! [panel.moderator]
//! key = "host"
//! name = "Moderator"
//!
//! [debate]
//! max_rounds = 5
//! round_delay_ms = 1000
//! ```

use crate::gateway::AgentServiceSettings;
use council_application::DebateParams;
use council_domain::{Participant, ParticipantRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Problems detected while validating a loaded configuration
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("panel has no experts")]
    NoExperts,

    #[error("participant key must not be blank")]
    BlankKey,

    #[error("duplicate participant key '{0}' (keys are case-insensitive)")]
    DuplicateKey(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent service endpoint settings
    pub api: FileApiConfig,
    /// Panel composition
    pub panel: FilePanelConfig,
    /// Deliberation loop settings
    pub debate: FileDebateConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api: FileApiConfig::default(),
            panel: FilePanelConfig::default(),
            debate: FileDebateConfig::default(),
        }
    }
}

/// `[api]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Endpoint root the agent ids are appended to
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
    /// Participant key to upstream agent id
    pub agents: BTreeMap<String, String>,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9380/api/v1/agents".to_string(),
            token: String::new(),
            timeout_seconds: 120,
            agents: BTreeMap::new(),
        }
    }
}

/// `[panel]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    pub experts: Vec<FileParticipant>,
    pub moderator: FileParticipant,
}

impl Default for FilePanelConfig {
    fn default() -> Self {
        Self {
            experts: vec![
                FileParticipant::new("general", "General Geology Expert"),
                FileParticipant::new("geophysical", "Geophysics Expert"),
                FileParticipant::new("geochemical", "Geochemistry Expert"),
                FileParticipant::new("achievement", "Prior Results Expert"),
            ],
            moderator: FileParticipant::new("host", "Moderator"),
        }
    }
}

/// One panel member entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipant {
    pub key: String,
    pub name: String,
}

impl FileParticipant {
    fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
        }
    }
}

impl Default for FileParticipant {
    fn default() -> Self {
        Self::new("host", "Moderator")
    }
}

/// `[debate]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Hard cap on moderator rounds
    pub max_rounds: u32,
    /// Pause between moderator rounds, in milliseconds
    pub round_delay_ms: u64,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            round_delay_ms: 1000,
        }
    }
}

impl FileConfig {
    /// Check panel consistency. Key resolution is case-insensitive at
    /// runtime, so duplicate detection folds case too.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.panel.experts.is_empty() {
            return Err(ConfigValidationError::NoExperts);
        }

        let mut seen = Vec::new();
        let moderator = std::iter::once(&self.panel.moderator);
        for participant in self.panel.experts.iter().chain(moderator) {
            let key = participant.key.trim().to_lowercase();
            if key.is_empty() {
                return Err(ConfigValidationError::BlankKey);
            }
            if seen.contains(&key) {
                return Err(ConfigValidationError::DuplicateKey(key));
            }
            seen.push(key);
        }
        Ok(())
    }

    /// Build the domain registry from the panel section
    pub fn registry(&self) -> ParticipantRegistry {
        let experts = self
            .panel
            .experts
            .iter()
            .map(|p| Participant::new(&p.key, &p.name))
            .collect();
        let moderator = Participant::new(&self.panel.moderator.key, &self.panel.moderator.name);
        ParticipantRegistry::new(experts, moderator)
    }

    /// Build the loop parameters from the debate section
    pub fn params(&self) -> DebateParams {
        DebateParams::new(
            self.debate.max_rounds,
            Duration::from_millis(self.debate.round_delay_ms),
        )
    }

    /// Build the gateway settings from the api section
    pub fn service_settings(&self) -> AgentServiceSettings {
        AgentServiceSettings {
            base_url: self.api.base_url.trim_end_matches('/').to_string(),
            token: self.api.token.clone(),
            timeout: Duration::from_secs(self.api.timeout_seconds),
            agents: self.api.agents.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.panel.experts.len(), 4);
        assert_eq!(config.panel.moderator.key, "host");
        assert_eq!(config.debate.max_rounds, 5);
        assert_eq!(config.debate.round_delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[api]
base_url = "https://ragflow.example/api/v1/agents/"
token = "secret"
timeout_seconds = 45

[api.agents]
general = "id-general"
host = "id-host"

[[panel.experts]]
key = "general"
name = "General Geology Expert"

[panel.moderator]
key = "host"
name = "Moderator"

[debate]
max_rounds = 3
round_delay_ms = 250
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.token, "secret");
        assert_eq!(config.api.agents["general"], "id-general");
        assert_eq!(config.panel.experts.len(), 1);
        assert_eq!(config.debate.max_rounds, 3);

        let settings = config.service_settings();
        assert_eq!(settings.base_url, "https://ragflow.example/api/v1/agents");
        assert_eq!(settings.timeout, Duration::from_secs(45));

        let params = config.params();
        assert_eq!(params.max_rounds, 3);
        assert_eq!(params.round_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_deserialize_partial_config_keeps_defaults() {
        let toml_str = r#"
[debate]
max_rounds = 2
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debate.max_rounds, 2);
        assert_eq!(config.debate.round_delay_ms, 1000);
        assert_eq!(config.panel.experts.len(), 4);
    }

    #[test]
    fn test_validate_duplicate_key_case_insensitive() {
        let mut config = FileConfig::default();
        config.panel.moderator.key = "GENERAL".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::DuplicateKey(k)) if k == "general"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_panel_and_blank_key() {
        let mut config = FileConfig::default();
        config.panel.experts.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NoExperts)
        ));

        let mut config = FileConfig::default();
        config.panel.experts[0].key = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::BlankKey)
        ));
    }

    #[test]
    fn test_registry_from_panel() {
        let config = FileConfig::default();
        let registry = config.registry();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.moderator_key(), "host");
        assert_eq!(registry.resolve("ACHIEVEMENT"), Some("achievement"));
    }
}

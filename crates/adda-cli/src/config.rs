use adda_agent::ModelConfig;
use adda_core::{AddaResult, PersonaConfig, PersonaRegistry};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct AddaConfig {
    /// Key of the persona used when a client does not pick one.
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub personas: Vec<PersonaConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_msg_len")]
    pub max_message_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_message_length: default_max_msg_len(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_max_msg_len() -> usize {
    4000
}

impl AddaConfig {
    /// Reads `path`; a missing file means every default applies.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let config_str = tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        Self::parse(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))
    }

    pub fn parse(config_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Built-in personas plus the configured ones, with the configured default.
    pub fn persona_registry(&self) -> AddaResult<PersonaRegistry> {
        let mut registry = PersonaRegistry::with_builtins();
        for persona in &self.personas {
            persona.validate()?;
            registry.register(persona.clone());
        }
        if let Some(key) = &self.persona {
            registry.set_default(key)?;
        }
        Ok(registry)
    }
}

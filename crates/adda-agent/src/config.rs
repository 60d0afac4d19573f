use adda_core::{AddaError, AddaResult};
use serde::{Deserialize, Serialize};

/// Environment variable holding the provider credential unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Which OpenAI-compatible service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Groq cloud inference, OpenAI-compatible API.
    Groq,
    /// OpenAI.
    OpenAi,
    /// OpenRouter.
    OpenRouter,
}

/// Provider and sampling settings shared by every persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Selects the default base URL.
    #[serde(default = "default_provider")]
    pub provider: LlmProvider,
    /// Model identifier sent with every request.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Name of the environment variable the credential is read from.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Never read from or written to config files; see [`ModelConfig::with_api_key_from`].
    #[serde(skip)]
    pub api_key: String,
    /// Overrides the provider base URL, e.g. for a local proxy.
    pub api_base_url: Option<String>,
    /// Used when the persona does not set its own temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_provider() -> LlmProvider {
    LlmProvider::Groq
}

fn default_model_id() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model_id: default_model_id(),
            api_key_env: default_api_key_env(),
            api_key: String::new(),
            api_base_url: None,
            temperature: default_temperature(),
        }
    }
}

impl ModelConfig {
    /// Base URL without the `/v1/chat/completions` suffix.
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url
        } else {
            match self.provider {
                LlmProvider::Groq => "https://api.groq.com/openai",
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
            }
        }
    }

    /// Fills in the credential from the process environment.
    pub fn with_api_key_from_env(self) -> AddaResult<Self> {
        self.with_api_key_from(|name| std::env::var(name).ok())
    }

    /// Fills in the credential using `lookup` to resolve `api_key_env`.
    ///
    /// A missing or blank value is a [`AddaError::Config`].
    pub fn with_api_key_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AddaResult<Self> {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => {
                self.api_key = key.trim().to_string();
                Ok(self)
            }
            _ => Err(AddaError::Config(format!(
                "{} not found! Set it in the environment or in a .env file.",
                self.api_key_env
            ))),
        }
    }

    /// Whether a credential has been filled in.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

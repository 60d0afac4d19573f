//! Persona definitions.
//!
//! A persona is the static bundle that gives a character its voice: the
//! system prompt, a few seed question/answer pairs that show the model how
//! the character talks, and the in-character apology used when a turn fails.
//! Every session runs the same pipeline; only the [`PersonaConfig`] differs.

mod builtin;

use crate::error::{AddaError, AddaResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder replaced with the raw error detail in a fallback template.
pub const ERROR_PLACEHOLDER: &str = "{error}";

/// One canned exchange shown to the model before the real conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedExchange {
    /// What the user asks.
    pub question: String,
    /// How the character answers.
    pub answer: String,
}

impl SeedExchange {
    /// Builds one exchange.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Strings the chat surfaces show around the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Presentation {
    /// Page heading; empty means the persona name.
    #[serde(default)]
    pub title: String,
    /// Line shown under the title.
    #[serde(default)]
    pub caption: String,
    /// Hint in the empty input box.
    #[serde(default = "default_input_placeholder")]
    pub input_placeholder: String,
    /// Label of the control that starts a new conversation.
    #[serde(default = "default_clear_label")]
    pub clear_label: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            title: String::new(),
            caption: String::new(),
            input_placeholder: default_input_placeholder(),
            clear_label: default_clear_label(),
        }
    }
}

fn default_input_placeholder() -> String {
    "Say something...".to_string()
}

fn default_clear_label() -> String {
    "New conversation".to_string()
}

fn default_fallback_template() -> String {
    "Something went wrong on my side. Please try again later. (Error: {error})".to_string()
}

/// The immutable definition of a character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonaConfig {
    /// Stable identifier used in config files and URLs.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Sent first on every turn.
    pub system_prompt: String,
    /// Example exchanges, sent to the model in this order on every turn.
    #[serde(default)]
    pub seed_exchanges: Vec<SeedExchange>,
    /// Sampling temperature for this character. Falls back to the model default.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// In-character apology; `{error}` is replaced with the error detail.
    #[serde(default = "default_fallback_template")]
    pub fallback_template: String,
    /// UI strings.
    #[serde(default)]
    pub presentation: Presentation,
}

impl PersonaConfig {
    /// Renders the apology shown in place of a failed reply.
    ///
    /// The error detail is always part of the result, even when the template
    /// forgot the placeholder.
    pub fn fallback_reply(&self, error_detail: &str) -> String {
        if self.fallback_template.contains(ERROR_PLACEHOLDER) {
            self.fallback_template.replace(ERROR_PLACEHOLDER, error_detail)
        } else {
            format!("{} (Error: {error_detail})", self.fallback_template)
        }
    }

    /// Title for chat surfaces, defaulting to the persona name.
    pub fn title(&self) -> &str {
        if self.presentation.title.is_empty() {
            &self.name
        } else {
            &self.presentation.title
        }
    }

    /// Checks the fields a config file could leave unusable.
    pub fn validate(&self) -> AddaResult<()> {
        if self.key.trim().is_empty() {
            return Err(AddaError::Config("persona key must not be empty".into()));
        }
        if self.system_prompt.trim().is_empty() {
            return Err(AddaError::Config(format!(
                "persona '{}' has an empty system prompt",
                self.key
            )));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(AddaError::Config(format!(
                    "persona '{}' temperature {t} is outside 0.0..=2.0",
                    self.key
                )));
            }
        }
        Ok(())
    }
}

/// The personas a deployment offers, with one of them as the default.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Arc<PersonaConfig>>,
    default: usize,
}

impl PersonaRegistry {
    /// A registry holding a single persona, which is also the default.
    pub fn new(default: PersonaConfig) -> Self {
        Self {
            personas: vec![Arc::new(default)],
            default: 0,
        }
    }

    /// Both built-in characters, with Chhapri Bhaiya as the default.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new(PersonaConfig::chhapri_bhaiya());
        registry.register(PersonaConfig::tobias_rieper());
        registry
    }

    /// Adds a persona, replacing any existing entry with the same key.
    pub fn register(&mut self, persona: PersonaConfig) {
        let persona = Arc::new(persona);
        match self.personas.iter().position(|p| p.key == persona.key) {
            Some(idx) => self.personas[idx] = persona,
            None => self.personas.push(persona),
        }
    }

    /// Makes `key` the persona used when a client does not pick one.
    pub fn set_default(&mut self, key: &str) -> AddaResult<()> {
        let idx = self
            .personas
            .iter()
            .position(|p| p.key == key)
            .ok_or_else(|| AddaError::Config(format!("unknown persona '{key}'")))?;
        self.default = idx;
        Ok(())
    }

    /// The persona registered under `key`.
    pub fn get(&self, key: &str) -> Option<Arc<PersonaConfig>> {
        self.personas.iter().find(|p| p.key == key).cloned()
    }

    /// The persona used when none is requested.
    pub fn default_persona(&self) -> Arc<PersonaConfig> {
        self.personas[self.default].clone()
    }

    /// Looks up `key`, falling back to the default for unknown or absent keys.
    pub fn resolve(&self, key: Option<&str>) -> Arc<PersonaConfig> {
        key.and_then(|k| self.get(k))
            .unwrap_or_else(|| self.default_persona())
    }

    /// Personas in registration order.
    pub fn list(&self) -> &[Arc<PersonaConfig>] {
        &self.personas
    }

    /// Number of registered personas.
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Always `false`; a registry holds at least its default.
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

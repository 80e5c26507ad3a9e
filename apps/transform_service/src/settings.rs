use std::env;

use crate::error::TransformError;

pub const AI_BASE_URL: &str = "AI_BASE_URL";
pub const AI_API_KEY: &str = "AI_API_KEY";
pub const AI_MODEL: &str = "AI_MODEL";

/// Key-value source the service reads its configuration from.
pub trait SettingsSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Process environment as the settings source.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// AI configuration read once at service construction. All three values are
/// required; an empty value counts as missing.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiSettings {
    pub fn from_source(source: &dyn SettingsSource) -> Result<Self, TransformError> {
        let read = |key| source.get(key).filter(|value: &String| !value.is_empty());

        match (read(AI_BASE_URL), read(AI_API_KEY), read(AI_MODEL)) {
            (Some(base_url), Some(api_key), Some(model)) => Ok(Self {
                base_url,
                api_key,
                model,
            }),
            _ => Err(TransformError::Configuration),
        }
    }
}

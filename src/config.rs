use crate::log_debug;

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables consulted for the API key, in priority order
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Default model used for every generation call
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Course plans longer than this are truncated before prompting
pub const DEFAULT_MAX_COURSE_PLAN_CHARS: usize = 250_000;

/// Configuration structure for Study Circle
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Gemini API key; environment variables take precedence
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_course_plan_chars")]
    pub max_course_plan_chars: usize,
    /// Whether to enable verbose logging (includes HTTP internals)
    #[serde(default)]
    pub verbose_logging: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_course_plan_chars() -> usize {
    DEFAULT_MAX_COURSE_PLAN_CHARS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            max_course_plan_chars: default_max_course_plan_chars(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Load the personal configuration, or defaults when none exists
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::get_config_path()?)?;
        log_debug!("Configuration loaded (model: {})", config.model);
        Ok(config)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })
    }

    /// Save the configuration to the personal config file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push("study-circle");
        path.push("config.toml");
        Ok(path)
    }

    /// API key from the environment, then the file; `None` when neither is set
    pub fn effective_api_key(&self) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .chain(std::iter::once(self.api_key.clone()))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    /// Update the configuration with new values
    pub fn update(
        &mut self,
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        max_course_plan_chars: Option<usize>,
    ) -> Result<()> {
        if let Some(key) = api_key {
            self.api_key = key;
        }
        if let Some(model) = model {
            if model.trim().is_empty() {
                return Err(anyhow!("Model name cannot be empty"));
            }
            self.model = model;
        }
        if let Some(url) = base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow!("Base URL must start with http:// or https://"));
            }
            self.base_url = url;
        }
        if let Some(limit) = max_course_plan_chars {
            if limit == 0 {
                return Err(anyhow!("Course plan limit must be greater than zero"));
            }
            self.max_course_plan_chars = limit;
        }

        log_debug!("Configuration updated (model: {})", self.model);
        Ok(())
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        match self.effective_api_key() {
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("****{tail}")
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("api_key = \"abc\"").expect("partial config parses");
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_course_plan_chars, DEFAULT_MAX_COURSE_PLAN_CHARS);
    }

    #[test]
    fn test_update_validates_inputs() {
        let mut config = Config::default();
        assert!(config.update(None, Some(" ".into()), None, None).is_err());
        assert!(config.update(None, None, Some("ftp://x".into()), None).is_err());
        assert!(config.update(None, None, None, Some(0)).is_err());

        config
            .update(Some("k".into()), Some("gemini-2.5-pro".into()), None, Some(1000))
            .expect("valid update");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.max_course_plan_chars, 1000);
    }
}

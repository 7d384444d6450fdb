use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::delay::DelayRange;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "prompt-hero.toml";
pub const FAQ_URL_ENV: &str = "PROMPT_HERO_FAQ_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub typing: TypingConfig,
    pub reply: ReplyConfig,
    pub faq: FaqConfig,
    pub chips: ChipConfig,
}

/// Cadence and content of the placeholder typing animation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub prompts: Vec<String>,
    pub type_tick: DelayRange,
    pub hold: DelayRange,
    pub delete_tick: DelayRange,
    pub restart: DelayRange,
    pub caret_blink_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            prompts: vec![
                "Refactor this function to be more declarative".to_string(),
                "Extract repeated UI into a reusable React component".to_string(),
                "Optimize loop to use map/filter instead of for".to_string(),
                "Convert this function to async/await".to_string(),
            ],
            type_tick: DelayRange::new(40, 80),
            hold: DelayRange::fixed(700),
            delete_tick: DelayRange::new(22, 42),
            restart: DelayRange::fixed(200),
            caret_blink_ms: 530,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// Wait before the reply starts to appear
    pub think: DelayRange,
    /// Wait between revealed characters
    pub reveal_tick: DelayRange,
    pub max_echo_chars: usize,
    pub thinking_frame_ms: u64,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            think: DelayRange::new(700, 1400),
            reveal_tick: DelayRange::new(10, 24),
            max_echo_chars: 90,
            thinking_frame_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    pub url: Option<String>,
    pub initial_open: Option<usize>,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            url: None,
            initial_open: Some(0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipConfig {
    pub chips: Vec<String>,
    pub visible_by_default: usize,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self {
            chips: [
                "functions as per context",
                "arrow expression",
                "file name of software",
                "Docker or container",
                "use camel-case",
                "component style",
                "optimize imports",
                "add tests",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            visible_by_default: 4,
        }
    }
}

impl WidgetConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: WidgetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from `prompt-hero.toml` in the working directory
    /// when no path is given. A missing default file yields the defaults; a
    /// missing explicit path is an error. `PROMPT_HERO_FAQ_URL` wins over the file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::read(default_path)?
                } else {
                    debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        if let Ok(url) = std::env::var(FAQ_URL_ENV) {
            if !url.trim().is_empty() {
                info!(url = %url, "FAQ url taken from environment");
                config.faq.url = Some(url);
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded widget config");
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typing.prompts.is_empty() {
            return Err(ConfigError::Invalid(
                "typing.prompts must contain at least one prompt".to_string(),
            ));
        }

        let ranges = [
            ("typing.type_tick", self.typing.type_tick),
            ("typing.hold", self.typing.hold),
            ("typing.delete_tick", self.typing.delete_tick),
            ("typing.restart", self.typing.restart),
            ("reply.think", self.reply.think),
            ("reply.reveal_tick", self.reply.reveal_tick),
        ];
        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "{} has min_ms {} greater than max_ms {}",
                    name, range.min_ms, range.max_ms
                )));
            }
        }

        if self.reply.max_echo_chars == 0 {
            return Err(ConfigError::Invalid(
                "reply.max_echo_chars must be greater than zero".to_string(),
            ));
        }
        if self.typing.caret_blink_ms == 0 || self.reply.thinking_frame_ms == 0 {
            return Err(ConfigError::Invalid(
                "animation periods must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = WidgetConfig::from_toml("").unwrap();
        assert_eq!(config.typing.prompts.len(), 4);
        assert_eq!(config.typing.hold, DelayRange::fixed(700));
        assert_eq!(config.reply.max_echo_chars, 90);
        assert_eq!(config.chips.visible_by_default, 4);
        assert_eq!(config.faq.initial_open, Some(0));
    }

    #[test]
    fn test_partial_override() {
        let config = WidgetConfig::from_toml(
            r#"
            [typing]
            prompts = ["only one"]

            [reply]
            think = { min_ms = 0, max_ms = 10 }
            "#,
        )
        .unwrap();
        assert_eq!(config.typing.prompts, vec!["only one".to_string()]);
        assert_eq!(config.typing.type_tick, DelayRange::new(40, 80));
        assert_eq!(config.reply.think, DelayRange::new(0, 10));
    }

    #[test]
    fn test_rejects_empty_prompt_list() {
        let err = WidgetConfig::from_toml("[typing]\nprompts = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = WidgetConfig::from_toml("[reply]\nreveal_tick = { min_ms = 30, max_ms = 5 }\n")
            .unwrap_err();
        assert!(err.to_string().contains("reply.reveal_tick"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = WidgetConfig::from_toml("[typing\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[faq]\nurl = \"http://localhost:9/faq.json\"").unwrap();

        let config = WidgetConfig::load(Some(file.path())).unwrap();
        // env override may be set on a developer machine; only check when absent
        if std::env::var(FAQ_URL_ENV).is_err() {
            assert_eq!(config.faq.url.as_deref(), Some("http://localhost:9/faq.json"));
        }
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = WidgetConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

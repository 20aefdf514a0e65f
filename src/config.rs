use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_VAR: &str = "PLAYGROUND_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "settings_config.json";
const ENV_PREFIX: &str = "PLAYGROUND";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    pub default_settings: DefaultsTable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    OpenAi,
    Dummy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Falls back to `OPENAI_API_KEY` when absent.
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    /// Model used for translate, summarize, extract and sentiment.
    pub task_model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            kind: BackendKind::OpenAi,
            api_key: None,
            api_base: None,
            task_model: "gpt-4o-mini".to_owned(),
        }
    }
}

/// Bounds, enumerations and defaults for the settings controls. Read-only after startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefaultsTable {
    pub model: Vec<String>,
    pub private_preview_models: Vec<String>,
    pub temperature: f32,
    pub temperature_min: f32,
    pub temperature_max: f32,
    pub max_tokens: u32,
    pub max_tokens_min: u32,
    pub max_tokens_max: u32,
    pub guardrails: bool,
    pub languages: Vec<String>,
}

impl DefaultsTable {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, list) in [
            ("model", &self.model),
            ("private_preview_models", &self.private_preview_models),
            ("languages", &self.languages),
        ] {
            if list.is_empty() {
                return Err(ConfigError::Invalid(format!("`{name}` must not be empty")));
            }
        }
        if !(self.temperature_min <= self.temperature && self.temperature <= self.temperature_max)
        {
            return Err(ConfigError::Invalid(format!(
                "`temperature` {} is outside [{}, {}]",
                self.temperature, self.temperature_min, self.temperature_max
            )));
        }
        if !(self.max_tokens_min <= self.max_tokens && self.max_tokens <= self.max_tokens_max) {
            return Err(ConfigError::Invalid(format!(
                "`max_tokens` {} is outside [{}, {}]",
                self.max_tokens, self.max_tokens_min, self.max_tokens_max
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Load(::config::ConfigError),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(e) => {
                write!(f, "Failed to load configuration: {}", e)
            }
            ConfigError::Invalid(msg) => {
                write!(f, "Invalid default settings: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<::config::ConfigError> for ConfigError {
    fn from(err: ::config::ConfigError) -> Self {
        ConfigError::Load(err)
    }
}

impl AppConfig {
    /// Path named by `PLAYGROUND_CONFIG`, or `settings_config.json` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Reads the file (format picked by extension), applies `PLAYGROUND_*` overrides
    /// and validates the defaults table.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg: AppConfig = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        cfg.default_settings.validate()?;
        log::debug!(
            "Loaded configuration from {}: backend {:?}",
            path.display(),
            cfg.backend.kind
        );
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    const SAMPLE: &str = r#"{
        "default_settings": {
            "model": ["llama3.1-8b", "mistral-large"],
            "private_preview_models": ["preview-1"],
            "temperature": 0.7,
            "temperature_min": 0.0,
            "temperature_max": 1.0,
            "max_tokens": 100,
            "max_tokens_min": 1,
            "max_tokens_max": 4096,
            "guardrails": false,
            "languages": ["en", "fr", "de"]
        }
    }"#;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_json_config() {
        let dir = tempdir().unwrap();
        let path = write_config(&dir, "settings_config.json", SAMPLE);

        let cfg = AppConfig::load(&path).unwrap();

        let defaults = &cfg.default_settings;
        assert_eq!(defaults.model, vec!["llama3.1-8b", "mistral-large"]);
        assert_eq!(defaults.private_preview_models, vec!["preview-1"]);
        assert_eq!(defaults.temperature, 0.7);
        assert_eq!(defaults.max_tokens_max, 4096);
        assert!(!defaults.guardrails);
        assert_eq!(defaults.languages.len(), 3);
        assert_eq!(cfg.backend.kind, BackendKind::OpenAi);
        assert_eq!(cfg.backend.task_model, "gpt-4o-mini");
    }

    #[test]
    fn load_toml_config_with_backend_section() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            "playground.toml",
            r#"
[backend]
kind = "dummy"
task_model = "small"

[default_settings]
model = ["m"]
private_preview_models = ["p"]
temperature = 0.5
temperature_min = 0.0
temperature_max = 1.0
max_tokens = 10
max_tokens_min = 1
max_tokens_max = 20
guardrails = true
languages = ["en"]
"#,
        );

        let cfg = AppConfig::load(&path).unwrap();

        assert_eq!(cfg.backend.kind, BackendKind::Dummy);
        assert_eq!(cfg.backend.task_model, "small");
        assert!(cfg.default_settings.guardrails);
    }

    #[test]
    fn missing_key_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            "settings_config.json",
            &SAMPLE.replace(r#""languages": ["en", "fr", "de"]"#, r#""unused": 1"#),
        );

        let result = AppConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempdir().unwrap();

        let result = AppConfig::load(&dir.path().join("absent.json"));

        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn default_outside_bounds_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            "settings_config.json",
            &SAMPLE.replace(r#""max_tokens": 100"#, r#""max_tokens": 5000"#),
        );

        let result = AppConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        assert!(result.unwrap_err().to_string().contains("max_tokens"));
    }

    #[test]
    fn empty_language_list_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            &dir,
            "settings_config.json",
            &SAMPLE.replace(r#"["en", "fr", "de"]"#, "[]"),
        );

        let result = AppConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}

pub mod edit;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "config.toml";
pub const MAPPING_FILENAME: &str = "mapping";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config.toml: {0}")]
    Parse(String),
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
    #[error("home directory not found; set JNS_CONFIG_DIR")]
    NoConfigDir,
}

/// Full `config.toml` contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub token: String,

    /// Alias -> job URL shortcuts, managed by `jns alias`.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiSettings>,
}

impl Settings {
    pub fn is_connected(&self) -> bool {
        !self.server.is_empty()
    }
}

/// LLM provider used for build log analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    pub provider: AiProvider,
    pub endpoint: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    Ollama,
}

impl AiProvider {
    pub const SUPPORTED: [AiProvider; 2] = [AiProvider::OpenAi, AiProvider::Ollama];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Ollama => "ollama",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com",
            AiProvider::Ollama => "http://localhost:11434",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(AiProvider::OpenAi),
            "ollama" => Ok(AiProvider::Ollama),
            other => Err(ConfigError::Parse(format!("unknown AI provider: {other}"))),
        }
    }
}

/// Configuration directory: `$JNS_CONFIG_DIR` if set, `~/.jnscli`
/// otherwise.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os("JNS_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".jnscli"))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

pub fn mapping_path(dir: &Path) -> PathBuf {
    dir.join(MAPPING_FILENAME)
}

/// Load settings, falling back to defaults when no config exists yet.
pub fn load(dir: &Path) -> Result<Settings, ConfigError> {
    let path = config_path(dir);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
}

pub fn save(dir: &Path, settings: &Settings) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;
    let content =
        toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    let path = config_path(dir);
    std::fs::write(&path, content).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_loads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = load(tmp.path()).unwrap();
        assert!(!settings.is_connected());
        assert!(settings.aliases.is_empty());
    }

    #[test]
    fn settings_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut settings = Settings {
            server: "https://jenkins.example.com".into(),
            username: "kim".into(),
            token: "secret".into(),
            ..Settings::default()
        };
        settings
            .aliases
            .insert("deploy".into(), "https://jenkins.example.com/job/deploy".into());
        save(tmp.path(), &settings).unwrap();

        let loaded = load(tmp.path()).unwrap();
        assert_eq!(loaded.server, settings.server);
        assert_eq!(loaded.aliases["deploy"], settings.aliases["deploy"]);
        assert!(loaded.ai.is_none());
    }

    #[test]
    fn ai_settings_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings {
            ai: Some(AiSettings {
                provider: AiProvider::Ollama,
                endpoint: "http://localhost:11434".into(),
                model: "llama3".into(),
                api_key: None,
            }),
            ..Settings::default()
        };
        save(tmp.path(), &settings).unwrap();

        let loaded = load(tmp.path()).unwrap();
        let ai = loaded.ai.unwrap();
        assert_eq!(ai.provider, AiProvider::Ollama);
        assert_eq!(ai.model, "llama3");
    }

    #[test]
    fn provider_parses_its_own_spelling() {
        for provider in AiProvider::SUPPORTED {
            assert_eq!(provider.as_str().parse::<AiProvider>().unwrap(), provider);
        }
        assert!("claude".parse::<AiProvider>().is_err());
    }

    #[test]
    fn garbage_config_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(config_path(tmp.path()), "server = [broken").unwrap();
        assert!(matches!(load(tmp.path()), Err(ConfigError::Parse(_))));
    }
}

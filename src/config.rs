use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODELS};
use crate::summarize::DEFAULT_MAX_INPUT_CHARS;

/// Environment variables checked for the Gemini API key, in order
pub const API_KEY_VARS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Preferred caption language
    pub lang: String,
    /// Candidate models, most preferred first
    pub models: Vec<String>,
    pub max_input_chars: usize,
    /// Timeout for each outbound call
    pub timeout_secs: u64,
    pub gemini_base_url: String,
    /// JSON transcript endpoint; InnerTube scraping is used when unset
    pub transcript_api: Option<String>,
    pub bind: String,
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            timeout_secs: 30,
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            transcript_api: None,
            bind: "127.0.0.1:8501".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load config from the given path, or ~/.config/ytnotes/config.toml if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// API key from the environment, then from the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key_with(|name| std::env::var(name).ok(), self.api_key.as_deref())
    }
}

fn resolve_api_key_with(lookup: impl Fn(&str) -> Option<String>, from_file: Option<&str>) -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .chain(from_file.map(str::to_string))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytnotes")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
lang = "es"
models = ["gemini-2.0-flash", "gemini-pro"]
max_input_chars = 4000
timeout_secs = 10
transcript_api = "http://localhost:8000/transcript"
bind = "0.0.0.0:9000"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.lang, "es");
        assert_eq!(config.models, ["gemini-2.0-flash", "gemini-pro"]);
        assert_eq!(config.max_input_chars, 4000);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.transcript_api.as_deref(), Some("http://localhost:8000/transcript"));
        assert_eq!(config.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.lang, "en");
        assert_eq!(config.models.len(), DEFAULT_MODELS.len());
        assert_eq!(config.max_input_chars, 8000);
        assert!(config.transcript_api.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, r#"lang = "fr""#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.lang, "fr");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_path_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.bind, "127.0.0.1:8501");
    }

    #[test]
    fn test_api_key_env_order() {
        let key = resolve_api_key_with(
            |name| match name {
                "GOOGLE_API_KEY" => Some("google".to_string()),
                "GEMINI_API_KEY" => Some("gemini".to_string()),
                _ => None,
            },
            Some("file"),
        );
        assert_eq!(key.as_deref(), Some("google"));
    }

    #[test]
    fn test_api_key_blank_env_falls_through_to_file() {
        let key = resolve_api_key_with(|_| Some("  ".to_string()), Some("file"));
        assert_eq!(key.as_deref(), Some("file"));
    }

    #[test]
    fn test_api_key_absent() {
        assert_eq!(resolve_api_key_with(|_| None, None), None);
    }
}

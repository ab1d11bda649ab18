use crate::utils::error::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional profile file. Every value here is overridden by flags and environment.
///
/// ```toml
/// [airtable]
/// api_key = "key..."
/// base_key = "app..."
/// endpoint = "https://api.airtable.com/v0"
/// typecast = true
/// request_timeout_seconds = 30
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub airtable: AirtableProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AirtableProfile {
    pub api_key: Option<String>,
    pub base_key: Option<String>,
    pub endpoint: Option<String>,
    pub typecast: Option<bool>,
    pub request_timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigError {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        Ok(config)
    }
}

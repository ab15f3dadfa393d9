use crate::utils::error::{EnrichError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Column indexes may be written as `city = 4` or `city = "4"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default, deserialize_with = "index_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "index_text")]
    pub addition: Option<String>,
    #[serde(default, deserialize_with = "index_text")]
    pub zipcode: Option<String>,
    #[serde(default, deserialize_with = "index_text")]
    pub city: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Text(String),
    Number(i64),
}

fn index_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<RawIndex>::deserialize(deserializer)?.map(|raw| match raw {
        RawIndex::Text(text) => text,
        RawIndex::Number(number) => number.to_string(),
    }))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EnrichError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EnrichError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEOCODER_ENDPOINT})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EnrichError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

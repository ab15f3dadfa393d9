#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::{DEFAULT_API_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::core::{ConfigProvider, FieldSelector};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

/// Effective settings for one run: command line over TOML over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_path: String,
    pub api_endpoint: String,
    pub timeout_seconds: u64,
    pub selector: FieldSelector,
}

#[cfg(feature = "cli")]
impl Settings {
    pub fn from_cli(cli: &cli::CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };
        Ok(Self::merge(cli, file.unwrap_or_default()))
    }

    pub fn merge(cli: &cli::CliConfig, file: TomlConfig) -> Self {
        let columns = file.columns;
        let pick = |flag: &Option<String>, fallback: Option<String>| {
            flag.clone().or(fallback).unwrap_or_default()
        };

        Self {
            input_path: cli.input_path.clone(),
            api_endpoint: cli
                .api_endpoint
                .clone()
                .or(file.geocoder.endpoint)
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            timeout_seconds: cli
                .timeout_seconds
                .or(file.geocoder.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            selector: FieldSelector {
                address: pick(&cli.address, columns.address),
                addition: pick(&cli.addition, columns.addition),
                zipcode: pick(&cli.zipcode, columns.zipcode),
                city: pick(&cli.city, columns.city),
            },
        }
    }
}

impl ConfigProvider for Settings {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_seconds
    }

    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn selector(&self) -> &FieldSelector {
        &self.selector
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_path", &self.input_path)?;
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub mod server;

use crate::domain::model::RequestSpec;
use crate::utils::error::{CurlError, Result};
use crate::utils::validation::{
    validate_host, validate_non_empty_list, validate_range, validate_request_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;

/// 固定的請求批次，順序即送出順序。
pub const DEFAULT_PATHS: [&str; 6] = ["/sleep", "/sleep", "/notfound", "/temp", "/test", "/"];

/// Where the batch goes. The dispatcher binary always uses `Default`;
/// library callers may load their own from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub host: String,
    pub port: u16,
    pub paths: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            paths: DEFAULT_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl DispatchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DispatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn base_url(&self) -> Result<Url> {
        let host = validate_host("host", &self.host)?;

        // 逐一設定 host 與 port，不用字串拼接
        let mut url = Url::parse("http://localhost/")?;
        url.set_host(Some(&host.to_string()))?;
        url.set_port(Some(self.port))
            .map_err(|()| CurlError::InvalidConfigValue {
                field: "port".to_string(),
                value: self.port.to_string(),
                reason: "Port cannot be set on this URL".to_string(),
            })?;
        Ok(url)
    }

    pub fn request_specs(&self) -> Result<Vec<RequestSpec>> {
        let base = self.base_url()?;
        self.paths
            .iter()
            .map(|path| RequestSpec::get(&base, path))
            .collect()
    }
}

impl Validate for DispatchConfig {
    fn validate(&self) -> Result<()> {
        validate_range("port", self.port, 1, u16::MAX)?;
        self.base_url()?;

        validate_non_empty_list("paths", &self.paths)?;
        for path in &self.paths {
            validate_request_path("paths", path)?;
        }

        Ok(())
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;

use fit_core::{FitConfig, DEFAULT_MAX_ATTEMPTS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is invalid: {value}")]
    Invalid { key: &'static str, value: String },
}

/// サーバー設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// アップロードを一時保存するディレクトリ
    pub upload_dir: PathBuf,
    pub fit: FitConfig,
}

impl ServerConfig {
    /// 環境変数から ServerConfig を作成する
    ///
    /// 任意の環境変数:
    /// - FIT_BIND_ADDR (既定: 0.0.0.0:8080)
    /// - FIT_UPLOAD_DIR (既定: OS の一時ディレクトリ)
    /// - FIT_MAX_ATTEMPTS (既定: 20, 15 未満は 15 に切り上げ)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("FIT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            key: "FIT_BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let upload_dir = lookup("FIT_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let max_attempts = match lookup("FIT_MAX_ATTEMPTS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "FIT_MAX_ATTEMPTS",
                value,
            })?,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        Ok(Self {
            bind_addr,
            upload_dir,
            fit: FitConfig::new(max_attempts),
        })
    }
}

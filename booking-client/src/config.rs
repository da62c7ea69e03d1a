//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default snapshot lifetime (1 hour)
pub const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 3600;

/// Default deposit share of the pre-ordered menu subtotal
pub const DEFAULT_DEPOSIT_RATE: f64 = 0.3;

/// Client configuration for the reservation backend
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | BOOKING_API_URL | http://localhost:5000/api | 后端 API 地址 |
/// | BOOKING_API_TOKEN | - | Bearer token |
/// | BOOKING_REQUEST_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | BOOKING_DATA_DIR | ./data | 本地存储目录 |
/// | BOOKING_SNAPSHOT_TTL_SECS | 3600 | 向导快照有效期(秒) |
/// | BOOKING_DEPOSIT_RATE | 0.3 | 定金比例 |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000/api")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the local storage database
    pub data_dir: PathBuf,

    /// Lifetime of a persisted wizard snapshot in seconds
    pub snapshot_ttl_secs: u64,

    /// Deposit share of the menu subtotal
    pub deposit_rate: f64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            data_dir: PathBuf::from("./data"),
            snapshot_ttl_secs: DEFAULT_SNAPSHOT_TTL_SECS,
            deposit_rate: DEFAULT_DEPOSIT_RATE,
        }
    }

    /// 从环境变量加载配置 (reads `.env` first if present)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::new(
            std::env::var("BOOKING_API_URL").unwrap_or_else(|_| "http://localhost:5000/api".into()),
        );
        config.token = std::env::var("BOOKING_API_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = std::env::var("BOOKING_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        if let Ok(dir) = std::env::var("BOOKING_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.snapshot_ttl_secs = std::env::var("BOOKING_SNAPSHOT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SNAPSHOT_TTL_SECS);
        config.deposit_rate = std::env::var("BOOKING_DEPOSIT_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|r: &f64| (0.0..=1.0).contains(r))
            .unwrap_or(DEFAULT_DEPOSIT_RATE);
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the local storage directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the snapshot lifetime
    pub fn with_snapshot_ttl(mut self, seconds: u64) -> Self {
        self.snapshot_ttl_secs = seconds;
        self
    }

    /// Set the deposit rate (clamped to 0..=1)
    pub fn with_deposit_rate(mut self, rate: f64) -> Self {
        self.deposit_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_secs)
    }

    /// Path of the redb local storage file
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("local_storage.redb")
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("http://api.test")
            .with_token("abc")
            .with_timeout(5)
            .with_snapshot_ttl(60)
            .with_deposit_rate(1.5)
            .with_data_dir("/tmp/booking");

        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5);
        assert_eq!(config.snapshot_ttl(), Duration::from_secs(60));
        assert_eq!(config.deposit_rate, 1.0);
        assert_eq!(
            config.storage_path(),
            PathBuf::from("/tmp/booking/local_storage.redb")
        );
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.snapshot_ttl_secs, DEFAULT_SNAPSHOT_TTL_SECS);
        assert_eq!(config.deposit_rate, DEFAULT_DEPOSIT_RATE);
        assert!(config.token.is_none());
    }
}

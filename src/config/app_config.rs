// ==========================================
// 库存看板后端 - 运行配置
// ==========================================
// 来源: 进程环境变量,启动时先加载 .env（存在时）
// 规则: 未设置 → 默认值; 设置但非法 → ConfigError
// ==========================================

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const STORE_URL: &str = "STORE_URL";
    pub const STORE_KEY: &str = "STORE_KEY";
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    pub const MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
    pub const STORE_RETRY_ATTEMPTS: &str = "STORE_RETRY_ATTEMPTS";
    pub const SAMPLE_DATA_DIR: &str = "SAMPLE_DATA_DIR";
    pub const SEED_ON_EMPTY: &str = "SEED_ON_EMPTY";
}

const DEFAULT_STORE_URL: &str = "inventory.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_SAMPLE_DATA_DIR: &str = "data";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("{0} is required when STORE_URL points at a hosted store")]
    MissingValue(String),
}

// ==========================================
// Environment - 运行环境
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

// ==========================================
// AppConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 行存储地址: http(s) URL → 托管表存储; 其它 → SQLite 文件路径或 :memory:
    pub store_url: String,
    /// 托管表存储访问密钥
    pub store_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub max_upload_bytes: usize,
    /// 存储调用总尝试次数（1 = 不重试）
    pub store_retry_attempts: u32,
    pub sample_data_dir: PathBuf,
    /// 启动时库存表为空则从样例数据灌入
    pub seed_on_empty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            store_key: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::Development,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            store_retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            sample_data_dir: PathBuf::from(DEFAULT_SAMPLE_DATA_DIR),
            seed_on_empty: false,
        }
    }
}

impl AppConfig {
    /// 从进程环境加载（先读取 .env）
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("已加载环境文件: {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Self {
            store_url: get(config_keys::STORE_URL).unwrap_or(defaults.store_url),
            store_key: get(config_keys::STORE_KEY),
            host: get(config_keys::HOST).unwrap_or(defaults.host),
            port: parse_or(get(config_keys::PORT), config_keys::PORT, defaults.port)?,
            environment: parse_or(
                get(config_keys::ENVIRONMENT),
                config_keys::ENVIRONMENT,
                defaults.environment,
            )?,
            max_upload_bytes: parse_or(
                get(config_keys::MAX_UPLOAD_BYTES),
                config_keys::MAX_UPLOAD_BYTES,
                defaults.max_upload_bytes,
            )?,
            store_retry_attempts: parse_or(
                get(config_keys::STORE_RETRY_ATTEMPTS),
                config_keys::STORE_RETRY_ATTEMPTS,
                defaults.store_retry_attempts,
            )?,
            sample_data_dir: get(config_keys::SAMPLE_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.sample_data_dir),
            seed_on_empty: parse_bool(get(config_keys::SEED_ON_EMPTY), config_keys::SEED_ON_EMPTY)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// 行存储是否为托管表存储（HTTP）
    pub fn uses_hosted_store(&self) -> bool {
        self.store_url.starts_with("http://") || self.store_url.starts_with("https://")
    }

    /// 监听地址 host:port
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store_retry_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::STORE_RETRY_ATTEMPTS.to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::MAX_UPLOAD_BYTES.to_string(),
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.uses_hosted_store() && self.store_key.is_none() {
            return Err(ConfigError::MissingValue(config_keys::STORE_KEY.to_string()));
        }
        Ok(())
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_bool(raw: Option<String>, key: &str) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("1") | Some("true") | Some("yes") | Some("on") => Ok(true),
        Some("0") | Some("false") | Some("no") | Some("off") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: other.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert!(!config.uses_hosted_store());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STORE_URL", "https://demo.example.com"),
            ("STORE_KEY", "secret"),
            ("PORT", "9000"),
            ("ENVIRONMENT", "Production"),
            ("SEED_ON_EMPTY", "true"),
        ])
        .unwrap();

        assert!(config.uses_hosted_store());
        assert_eq!(config.port, 9000);
        assert!(config.environment.is_production());
        assert!(config.seed_on_empty);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("ENVIRONMENT", "staging")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("STORE_RETRY_ATTEMPTS", "0")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("SEED_ON_EMPTY", "maybe")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_hosted_store_requires_key() {
        assert_eq!(
            load(&[("STORE_URL", "http://localhost:54321")]),
            Err(ConfigError::MissingValue("STORE_KEY".to_string()))
        );
    }
}

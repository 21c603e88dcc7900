// ==========================================
// 库存看板后端 - 配置层
// ==========================================
// 职责: 从环境变量（含 .env）加载运行配置
// ==========================================

pub mod app_config;

pub use app_config::{config_keys, AppConfig, ConfigError, Environment};

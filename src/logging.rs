// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 开发环境: 可读文本; 生产环境: JSON 行
// ==========================================

use crate::config::Environment;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=inventory_backend=trace
///
/// 重复调用无副作用（已存在全局 subscriber 时忽略）
pub fn init(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let _ = if environment.is_production() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

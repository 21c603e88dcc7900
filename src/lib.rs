// ==========================================
// 库存看板后端 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite / 托管表存储
// 系统定位: 库存与订单表格导入、全表查询、看板汇总
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与汇总
pub mod domain;

// 数据仓储层 - 行存储契约与后端
pub mod repository;

// 导入层 - 上传表格
pub mod importer;

// 配置层 - 环境变量
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/表结构）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 路由与状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, UploadResponse};
pub use app::{build_router, AppState};
pub use config::AppConfig;
pub use domain::{AnalyticsSummary, InventoryItem, Order};
pub use repository::{RowStore, SqliteRowStore};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存看板后端";

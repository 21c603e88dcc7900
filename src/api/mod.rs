// ==========================================
// 库存看板后端 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 路由调用
// 约定: 上传接口在响应体内报告错误; 查询/统计接口吞掉错误并降级
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod import_api;
pub mod query_api;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ErrorDetails, UploadResponse};
pub use import_api::ImportApi;
pub use query_api::QueryApi;

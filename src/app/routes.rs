// ==========================================
// 库存看板后端 - HTTP 路由
// ==========================================
// 端点:
// - GET  /api/inventory
// - GET  /api/orders
// - GET  /api/analytics/summary
// - POST /api/upload/inventory   (multipart 字段 file)
// - POST /api/upload/orders      (multipart 字段 file)
// - OPTIONS 任意路径 → "OK"（CORS 预检）
// CORS: 允许所有来源/方法/头,不要求凭据
// ==========================================

use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, Request};
use axum::middleware::{from_fn, Next};
use axum::response::Response;
use axum::routing::{get, options, post};
use axum::{Json, Router};

use crate::api::{ApiError, UploadResponse};
use crate::app::state::AppState;
use crate::domain::{AnalyticsSummary, InventoryItem, Order};

/// 上传文件所在的 multipart 字段名
pub const UPLOAD_FIELD: &str = "file";

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/inventory", get(list_inventory).options(preflight))
        .route("/api/orders", get(list_orders).options(preflight))
        .route(
            "/api/analytics/summary",
            get(analytics_summary).options(preflight),
        )
        .route(
            "/api/upload/inventory",
            post(upload_inventory).options(preflight),
        )
        .route("/api/upload/orders", post(upload_orders).options(preflight))
        .route("/", options(preflight))
        .route("/*path", options(preflight))
        .layer(from_fn(cors_middleware))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

// ===== 查询 =====

async fn list_inventory(State(state): State<AppState>) -> Json<Vec<InventoryItem>> {
    Json(state.query_api.list_inventory().await)
}

async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.query_api.list_orders().await)
}

async fn analytics_summary(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    Json(state.dashboard_api.analytics_summary().await)
}

// ===== 上传 =====

async fn upload_inventory(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<UploadResponse> {
    match read_upload(multipart).await {
        Ok((filename, content)) => {
            Json(state.import_api.upload_inventory(&filename, &content).await)
        }
        Err(err) => Json(rejected_upload(err)),
    }
}

async fn upload_orders(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<UploadResponse> {
    match read_upload(multipart).await {
        Ok((filename, content)) => Json(state.import_api.upload_orders(&filename, &content).await),
        Err(err) => Json(rejected_upload(err)),
    }
}

/// 读取 file 字段
///
/// # 返回
/// - Ok((文件名, 内容)): 文件名缺失时为空串（按表格文件解析）
/// - Err(ValidationError): 非 multipart 请求体 / 缺少 file 字段 / 读取失败（含超限）
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(String, Vec<u8>), ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::ValidationError(format!("Expected a multipart upload: {}", e)))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::ValidationError(format!("Could not read upload: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::ValidationError(format!("Could not read upload: {}", e)))?;
        return Ok((filename, content.to_vec()));
    }

    Err(ApiError::ValidationError(format!(
        "No file provided in form field '{}'",
        UPLOAD_FIELD
    )))
}

fn rejected_upload(err: ApiError) -> UploadResponse {
    tracing::warn!("上传请求被拒绝: {}", err);
    UploadResponse::failure(&err)
}

// ===== CORS =====

async fn preflight() -> &'static str {
    "OK"
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-methods", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-headers", HeaderValue::from_static("*"));
    resp
}

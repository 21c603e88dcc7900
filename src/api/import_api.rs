// ==========================================
// 库存看板后端 - 导入API
// ==========================================
// 职责: 驱动导入器,把结果/错误包装为上传响应体
// ==========================================

use crate::api::error::{ApiError, UploadResponse};
use crate::importer::{ImportSummary, InventoryImporter, OrderImporter, TabularImporter};
use crate::repository::{InventoryRepository, OrderRepository};
use chrono::{DateTime, Utc};

const INVENTORY_SUCCESS: &str = "Inventory data uploaded successfully";
const ORDERS_SUCCESS: &str = "Orders data uploaded successfully";

/// 导入API
pub struct ImportApi {
    inventory_importer: InventoryImporter,
    order_importer: OrderImporter,
}

impl ImportApi {
    pub fn new(inventory_repo: InventoryRepository, order_repo: OrderRepository) -> Self {
        Self {
            inventory_importer: InventoryImporter::new(inventory_repo.clone()),
            order_importer: OrderImporter::new(inventory_repo, order_repo),
        }
    }

    /// 上传库存文件（按件号对账）
    pub async fn upload_inventory(&self, filename: &str, content: &[u8]) -> UploadResponse {
        let started = Utc::now();
        let result = self.inventory_importer.import(filename, content).await;
        Self::respond("inventory", filename, INVENTORY_SUCCESS, started, result.map_err(ApiError::from))
    }

    /// 上传订单文件（预检后整批插入）
    pub async fn upload_orders(&self, filename: &str, content: &[u8]) -> UploadResponse {
        let started = Utc::now();
        let result = self.order_importer.import(filename, content).await;
        Self::respond("orders", filename, ORDERS_SUCCESS, started, result.map_err(ApiError::from))
    }

    fn respond(
        table: &str,
        filename: &str,
        message: &str,
        started: DateTime<Utc>,
        result: Result<ImportSummary, ApiError>,
    ) -> UploadResponse {
        let elapsed_ms = (Utc::now() - started).num_milliseconds();
        match result {
            Ok(summary) => {
                tracing::info!(
                    "上传完成: table={}, file={}, count={}, elapsed_ms={}",
                    table,
                    filename,
                    summary.count,
                    elapsed_ms
                );
                UploadResponse::success(message, summary.count)
            }
            Err(err) => {
                tracing::warn!(
                    "上传失败: table={}, file={}, type={}, elapsed_ms={}, error={}",
                    table,
                    filename,
                    err.kind(),
                    elapsed_ms,
                    err
                );
                UploadResponse::failure(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{RowStore, SqliteRowStore};
    use std::sync::Arc;

    fn api() -> ImportApi {
        let store: Arc<dyn RowStore> = Arc::new(SqliteRowStore::new(":memory:").unwrap());
        ImportApi::new(
            InventoryRepository::new(store.clone()),
            OrderRepository::new(store),
        )
    }

    #[tokio::test]
    async fn test_upload_inventory_success_body() {
        let csv = "Part Number,Name,In Stock\nKQ-1,Pad,3\nKQ-2,Seal,4\n";

        let response = api().upload_inventory("inv.csv", csv.as_bytes()).await;

        assert_eq!(response, UploadResponse::success(INVENTORY_SUCCESS, 2));
    }

    #[tokio::test]
    async fn test_upload_orders_without_inventory_reports_validation_error() {
        let csv = "Order Number,Part Number,Quantity\nPO-1,KQ-1,1\n";

        let response = api().upload_orders("orders.csv", csv.as_bytes()).await;

        assert!(!response.success);
        assert_eq!(response.details.unwrap().kind, "ValidationError");
    }
}

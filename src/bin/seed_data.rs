// ==========================================
// 库存看板后端 - 样例数据灌入工具
// ==========================================
// 用法: seed_data [样例目录]
// 目标存储由 STORE_URL / STORE_KEY 决定（与服务一致）
// ==========================================

use anyhow::Context;
use inventory_backend::app::{build_store, SampleSeeder};
use inventory_backend::config::AppConfig;
use inventory_backend::logging;
use inventory_backend::repository::{InventoryRepository, OrderRepository};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("配置加载失败")?;
    logging::init(config.environment);

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.sample_data_dir.clone());

    tracing::info!("开始灌入样例数据: dir={}, store={}", data_dir.display(), config.store_url);

    let store = build_store(&config).context("行存储初始化失败")?;
    let seeder = SampleSeeder::new(
        InventoryRepository::new(store.clone()),
        OrderRepository::new(store),
        data_dir,
    );

    let report = seeder.seed_all().await.context("样例数据灌入失败")?;

    tracing::info!(
        "样例数据灌入完成: inventory={}, orders={}",
        report.inventory,
        report.orders
    );
    Ok(())
}

// ==========================================
// 库存看板后端 - HTTP 服务主入口
// ==========================================

use anyhow::Context;
use inventory_backend::app::{build_router, AppState, SampleSeeder};
use inventory_backend::config::AppConfig;
use inventory_backend::logging;
use inventory_backend::repository::{InventoryRepository, OrderRepository};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("配置加载失败")?;

    // 初始化日志系统
    logging::init(config.environment);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", inventory_backend::APP_NAME, inventory_backend::VERSION);
    tracing::info!("运行环境: {:?}", config.environment);
    tracing::info!("==================================================");

    let state = AppState::from_config(&config).context("行存储初始化失败")?;

    if config.seed_on_empty {
        let seeder = SampleSeeder::new(
            InventoryRepository::new(state.store.clone()),
            OrderRepository::new(state.store.clone()),
            &config.sample_data_dir,
        );
        // 灌入失败不阻止服务启动
        match seeder.seed_inventory_if_empty().await {
            Ok(Some(count)) => tracing::info!("库存表为空,已灌入 {} 条样例库存", count),
            Ok(None) => tracing::info!("库存表已有数据,跳过样例灌入"),
            Err(e) => tracing::error!("样例库存灌入失败: {}", e),
        }
    }

    let app = build_router(state, config.max_upload_bytes);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法监听 {}", address))?;
    tracing::info!("服务已启动: http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听退出信号: {}", e);
    }
}

// ==========================================
// 库存看板后端 - 应用层
// ==========================================
// 职责: 组装共享状态、HTTP 路由与样例数据灌入
// ==========================================

pub mod routes;
pub mod seeder;
pub mod state;

pub use routes::build_router;
pub use seeder::{SampleSeeder, SeedError, SeedReport};
pub use state::{build_store, AppState};

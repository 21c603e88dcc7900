// ==========================================
// 库存看板后端 - 导入层
// ==========================================
// 职责: 上传表格 → 类型化记录 → 与行存储对账（按自然键插入/更新）
// 支持: CSV / Excel
// ==========================================

// 模块声明
pub mod conflict_handler;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod inventory_importer;
pub mod order_importer;

// 重导出核心类型
pub use conflict_handler::ConflictHandler;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use importer_trait::{FileParser, ImportSummary, RawRecord, TabularImporter};
pub use inventory_importer::InventoryImporter;
pub use order_importer::OrderImporter;

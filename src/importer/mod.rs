// ==========================================
// 社員名簿管理 - 导入层
// ==========================================
// 职责: 社员名簿文件一括导入（会社/部署自动补全）
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod batch_assembler;
pub mod call_guard;
pub mod commit_coordinator;
pub mod employee_importer_impl;
pub mod employee_importer_trait;
pub mod error;
pub mod file_parser;
pub mod reference_resolver;
pub mod result_aggregator;
pub mod row_validator;

// 重导出核心类型
pub use call_guard::{CallGuard, Interruption};
pub use commit_coordinator::{CommitCoordinator, CommitFailure, CommitOutcome};
pub use employee_importer_impl::EmployeeImporterImpl;
pub use error::{ImportError, ParseResult, ResolutionError};
pub use file_parser::{check_headers, CsvParser, ExcelParser, ParsedTable, UniversalFileParser};
pub use reference_resolver::{ReferenceResolver, ResolutionCache, ResolutionStats};
pub use row_validator::RowValidator;

// 重导出 Trait 接口
pub use employee_importer_trait::{EmployeeImporter, FileParser};

// ==========================================
// 社員名簿管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 社員名簿 CSV/Excel 一括インポート（会社・部署の自動登録）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ja");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 一括インポートエンジン
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{CompanyId, DepartmentId, EmployeeRecord, ImportResult, RawRow, RowError};

// 导入器
pub use importer::{EmployeeImporter, EmployeeImporterImpl};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "社員名簿管理";

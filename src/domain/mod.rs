// ==========================================
// 社員名簿管理 - 领域模型层
// ==========================================
// 职责: 定义领域实体、值对象、导入管道中间产物
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod employee;
pub mod import;
pub mod types;

// 重导出核心类型
pub use employee::EmployeeRecord;
pub use import::{
    columns, FieldError, ImportResult, RawRow, ResolvedRefs, RowError, ValidatedRow,
    BATCH_LEVEL_ROW, FIRST_DATA_ROW_NUMBER,
};
pub use types::{CompanyId, DepartmentId};

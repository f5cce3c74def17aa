// ==========================================
// 社員名簿管理 - 社员记录组装
// ==========================================
// 职责: ValidatedRow + ResolvedRefs → EmployeeRecord（纯映射）
// ==========================================

use crate::domain::{EmployeeRecord, ResolvedRefs, ValidatedRow};

/// 组装单条社员记录
pub fn assemble(row: ValidatedRow, refs: ResolvedRefs) -> EmployeeRecord {
    EmployeeRecord {
        company_id: refs.company_id,
        department_id: refs.department_id,
        last_name: row.last_name,
        first_name: row.first_name,
        email: row.email,
        position: row.position,
    }
}

/// 按行顺序组装整批
///
/// 调用方保证 rows 与 refs 一一对应（同长、同序）
pub fn assemble_all(rows: Vec<ValidatedRow>, refs: Vec<ResolvedRefs>) -> Vec<EmployeeRecord> {
    debug_assert_eq!(rows.len(), refs.len());
    rows.into_iter()
        .zip(refs)
        .map(|(row, refs)| assemble(row, refs))
        .collect()
}

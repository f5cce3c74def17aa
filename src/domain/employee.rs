// ==========================================
// 社員名簿管理 - 社员实体
// ==========================================
// 职责: 入库前的完整社员记录（所有外键已解析）
// ==========================================

use crate::domain::types::{CompanyId, DepartmentId};
use serde::{Deserialize, Serialize};

// ==========================================
// EmployeeRecord - 待入库社员记录
// ==========================================
// 生命周期: 由 BatchAssembler 生成，移交 CommitCoordinator 后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub company_id: CompanyId,               // 所属会社
    pub department_id: Option<DepartmentId>, // 所属部署（可为空）
    pub last_name: String,                   // 姓
    pub first_name: String,                  // 名
    pub email: String,                       // メールアドレス（全局唯一）
    pub position: String,                    // 役職
}

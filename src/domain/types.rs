// ==========================================
// 社員名簿管理 - 领域类型定义
// ==========================================
// 职责: 实体 ID 值对象（由存储层生成，导入层只透传）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 会社 ID (Company Id)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

impl CompanyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CompanyId {
    fn from(value: String) -> Self {
        CompanyId(value)
    }
}

// ==========================================
// 部署 ID (Department Id)
// ==========================================
// 部署隶属于会社，同名部署在不同会社下是不同实体
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(pub String);

impl DepartmentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DepartmentId {
    fn from(value: String) -> Self {
        DepartmentId(value)
    }
}

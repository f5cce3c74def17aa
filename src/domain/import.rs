// ==========================================
// 社員名簿管理 - 导入领域模型
// ==========================================
// 职责: 导入管道各阶段的中间产物与最终结果
// 流程: RawRow → ValidatedRow → (ResolvedRefs) → EmployeeRecord → ImportResult
// ==========================================

use crate::domain::types::{CompanyId, DepartmentId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 导入文件列名（表头必须与此集合完全一致）
// ==========================================
pub mod columns {
    pub const COMPANY_NAME: &str = "会社名";
    pub const LAST_NAME: &str = "姓";
    pub const FIRST_NAME: &str = "名";
    pub const EMAIL: &str = "メールアドレス";
    pub const DEPARTMENT: &str = "部署";
    pub const POSITION: &str = "役職";

    /// 表头必需列（顺序即模板顺序）
    pub const EXPECTED: [&str; 6] = [COMPANY_NAME, LAST_NAME, FIRST_NAME, EMAIL, DEPARTMENT, POSITION];
}

/// 数据行起始行号（第 1 行为表头）
pub const FIRST_DATA_ROW_NUMBER: usize = 2;

/// 批次级错误使用的行号
pub const BATCH_LEVEL_ROW: usize = 0;

// ==========================================
// RawRow - 解析后的原始行
// ==========================================
// 用途: 文件解析产物（列名 → 原始值）
// row_number: 文件行号（表头为第 1 行）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row_number: usize, fields: HashMap<String, String>) -> Self {
        Self { row_number, fields }
    }

    /// 按列名取值，缺失列视为空字符串
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// 是否整行为空
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

// ==========================================
// ValidatedRow - 校验通过的行
// ==========================================
// 不变量: 所有字段已 TRIM，必填字段非空，邮箱格式合法
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRow {
    pub row_number: usize,
    pub company_name: String,
    pub department_name: Option<String>, // 空白 → None（「部署なし」）
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub position: String,
}

// ==========================================
// ResolvedRefs - 外键解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRefs {
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
}

// ==========================================
// FieldError - 字段级校验错误
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldError {
    CompanyNameRequired,
    LastNameRequired,
    FirstNameRequired,
    EmailRequired,
    EmailInvalid,
    PositionRequired,
}

impl FieldError {
    /// i18n 消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            FieldError::CompanyNameRequired => "import.company_name_required",
            FieldError::LastNameRequired => "import.last_name_required",
            FieldError::FirstNameRequired => "import.first_name_required",
            FieldError::EmailRequired => "import.email_required",
            FieldError::EmailInvalid => "import.email_invalid",
            FieldError::PositionRequired => "import.position_required",
        }
    }
}

// ==========================================
// RowError - 行级错误报告
// ==========================================
// row_number = 0 表示批次级错误（非某一行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row_number: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row_number: usize, message: impl Into<String>) -> Self {
        Self {
            row_number,
            message: message.into(),
        }
    }

    /// 批次级错误
    pub fn batch(message: impl Into<String>) -> Self {
        Self::new(BATCH_LEVEL_ROW, message)
    }

    pub fn is_batch_level(&self) -> bool {
        self.row_number == BATCH_LEVEL_ROW
    }
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
// 用途: 返回给 UI 层渲染；生成后不可变
// 不变量: total_rows 恒等于解析出的数据行数（与成败无关）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub total_rows: usize,
    pub errors: Vec<RowError>,
}

impl ImportResult {
    pub fn succeeded(total_rows: usize) -> Self {
        Self {
            success: true,
            total_rows,
            errors: Vec::new(),
        }
    }

    pub fn failed(total_rows: usize, errors: Vec<RowError>) -> Self {
        Self {
            success: false,
            total_rows,
            errors,
        }
    }

    /// 单条批次级错误的失败结果
    pub fn batch_failure(total_rows: usize, message: impl Into<String>) -> Self {
        Self::failed(total_rows, vec![RowError::batch(message)])
    }
}

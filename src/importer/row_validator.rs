// ==========================================
// 社員名簿管理 - 行校验器
// ==========================================
// 职责: 逐行校验必填字段与邮箱格式（纯函数，无副作用）
// 规则: 每行评估全部规则，不在首个错误处停止
// ==========================================

use crate::domain::{columns, FieldError, RawRow, RowError, ValidatedRow};
use crate::i18n::t_in;
use regex::Regex;
use std::sync::LazyLock;

// local@domain.tld，各段不含空白与 @
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// 邮箱格式检查
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

// ==========================================
// RowValidator
// ==========================================
#[derive(Debug, Clone)]
pub struct RowValidator {
    locale: String,
    delimiter: String,
}

impl RowValidator {
    pub fn new(locale: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            delimiter: delimiter.into(),
        }
    }

    /// 校验单行
    ///
    /// # 返回
    /// - Ok(ValidatedRow): 已 TRIM，部署空白转为 None
    /// - Err(Vec<FieldError>): 按列顺序列出全部违规
    pub fn validate(&self, row: &RawRow) -> Result<ValidatedRow, Vec<FieldError>> {
        let company_name = row.get(columns::COMPANY_NAME).trim();
        let last_name = row.get(columns::LAST_NAME).trim();
        let first_name = row.get(columns::FIRST_NAME).trim();
        let email = row.get(columns::EMAIL).trim();
        let department = row.get(columns::DEPARTMENT).trim();
        let position = row.get(columns::POSITION).trim();

        let mut errors = Vec::new();

        if company_name.is_empty() {
            errors.push(FieldError::CompanyNameRequired);
        }
        if last_name.is_empty() {
            errors.push(FieldError::LastNameRequired);
        }
        if first_name.is_empty() {
            errors.push(FieldError::FirstNameRequired);
        }
        if email.is_empty() {
            errors.push(FieldError::EmailRequired);
        } else if !is_valid_email(email) {
            errors.push(FieldError::EmailInvalid);
        }
        if position.is_empty() {
            errors.push(FieldError::PositionRequired);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedRow {
            row_number: row.row_number,
            company_name: company_name.to_string(),
            department_name: (!department.is_empty()).then(|| department.to_string()),
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            email: email.to_string(),
            position: position.to_string(),
        })
    }

    /// 将单行的字段错误合并为一条 RowError
    pub fn row_error(&self, row_number: usize, errors: &[FieldError]) -> RowError {
        let message = errors
            .iter()
            .map(|e| t_in(&self.locale, e.message_key()))
            .collect::<Vec<_>>()
            .join(&self.delimiter);
        RowError::new(row_number, message)
    }

    /// 校验整批
    ///
    /// # 返回
    /// - (通过的行, 行错误)；行错误按行号升序，每行至多一条
    pub fn validate_all(&self, rows: &[RawRow]) -> (Vec<ValidatedRow>, Vec<RowError>) {
        let mut valid = Vec::with_capacity(rows.len());
        let mut errors = Vec::new();

        for row in rows {
            match self.validate(row) {
                Ok(validated) => valid.push(validated),
                Err(field_errors) => errors.push(self.row_error(row.row_number, &field_errors)),
            }
        }

        errors.sort_by_key(|e| e.row_number);
        (valid, errors)
    }
}

// ==========================================
// 社員名簿管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// - ImportError: 结构性错误（文件/表头），在校验前终止
// - ResolutionError: 会社/部署解析失败，终止整个批次
// 约定: 引擎对外一律转换为 RowError，不向调用方抛出
// ==========================================

use crate::i18n::{t_in, t_in_with_args};
use crate::importer::call_guard::Interruption;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块结构性错误
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 表头错误 =====
    #[error("表头不匹配: 缺少 {missing:?}, 多余 {unexpected:?}")]
    HeaderMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 面向用户的消息
    pub fn user_message(&self, locale: &str) -> String {
        match self {
            ImportError::FileNotFound(path) => {
                t_in_with_args(locale, "import.file_not_found", &[("path", path)])
            }
            ImportError::UnsupportedFormat(_) => t_in(locale, "import.unsupported_format"),
            ImportError::FileReadError(_) => t_in(locale, "import.file_read_failed"),
            ImportError::ExcelParseError(_) | ImportError::CsvParseError(_) => {
                t_in(locale, "import.parse_failed")
            }
            ImportError::HeaderMismatch {
                missing,
                unexpected,
            } => {
                let missing = if missing.is_empty() { "-".to_string() } else { missing.join(", ") };
                let unexpected = if unexpected.is_empty() {
                    "-".to_string()
                } else {
                    unexpected.join(", ")
                };
                t_in_with_args(
                    locale,
                    "import.header_mismatch",
                    &[("missing", &missing), ("unexpected", &unexpected)],
                )
            }
            ImportError::InternalError(_) | ImportError::Other(_) => t_in(locale, "common.failure"),
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ParseResult<T> = Result<T, ImportError>;

/// 会社/部署解析错误（批次级，终止导入）
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("会社创建失败 (name={name}): {source}")]
    CompanyCreateFailed {
        name: String,
        #[source]
        source: RepositoryError,
    },

    #[error("部署创建失败 (company_id={company_id}, name={name}): {source}")]
    DepartmentCreateFailed {
        company_id: String,
        name: String,
        #[source]
        source: RepositoryError,
    },

    #[error("会社/部署查询失败: {0}")]
    LookupFailed(#[source] RepositoryError),

    #[error(transparent)]
    Interrupted(#[from] Interruption),
}

impl ResolutionError {
    /// 面向用户的消息
    pub fn user_message(&self, locale: &str) -> String {
        match self {
            ResolutionError::CompanyCreateFailed { .. } => t_in(locale, "import.company_create_failed"),
            ResolutionError::DepartmentCreateFailed { .. } => {
                t_in(locale, "import.department_create_failed")
            }
            ResolutionError::LookupFailed(_) => t_in(locale, "import.lookup_failed"),
            ResolutionError::Interrupted(interruption) => interruption.user_message(locale),
        }
    }
}

// ==========================================
// 社員名簿管理 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 约束违反统一映射为 ConstraintCode（对齐 PostgreSQL SQLSTATE）
// ==========================================

use thiserror::Error;

// ==========================================
// ConstraintCode - 约束违反分类
// ==========================================
// 导入层依据此代码区分「邮箱重复」与其他入库失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintCode {
    UniqueViolation,     // 23505
    ForeignKeyViolation, // 23503
    NotNullViolation,    // 23502
    Other,
}

impl ConstraintCode {
    /// 对应的 SQLSTATE
    pub fn sqlstate(&self) -> Option<&'static str> {
        match self {
            ConstraintCode::UniqueViolation => Some("23505"),
            ConstraintCode::ForeignKeyViolation => Some("23503"),
            ConstraintCode::NotNullViolation => Some("23502"),
            ConstraintCode::Other => None,
        }
    }
}

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    #[error("非空约束违反: {0}")]
    NotNullViolation(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 约束分类（非约束类错误返回 Other）
    pub fn constraint_code(&self) -> ConstraintCode {
        match self {
            RepositoryError::UniqueConstraintViolation(_) => ConstraintCode::UniqueViolation,
            RepositoryError::ForeignKeyViolation(_) => ConstraintCode::ForeignKeyViolation,
            RepositoryError::NotNullViolation(_) => ConstraintCode::NotNullViolation,
            _ => ConstraintCode::Other,
        }
    }

    /// 错误详情（约束违反时为数据库原始消息）
    pub fn detail(&self) -> String {
        match self {
            RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg)
            | RepositoryError::NotNullViolation(msg)
            | RepositoryError::DatabaseQueryError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else if msg.contains("NOT NULL") {
                    RepositoryError::NotNullViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ==========================================
// 社員名簿管理 - 名簿数据访问 Trait
// ==========================================
// 职责: 定义导入引擎消费的三类存储接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{CompanyId, DepartmentId, EmployeeRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CompanyStore Trait
// ==========================================
// 实现者: CompanyRepository（使用 rusqlite）
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// 按会社名精确查询
    ///
    /// # 返回
    /// - Ok(Some(id)): 已存在
    /// - Ok(None): 不存在
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<CompanyId>>;

    /// 创建会社，返回新 ID
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 同名会社已存在
    async fn create(&self, name: &str) -> RepositoryResult<CompanyId>;

    /// 删除会社（仅用于导入失败后的补偿）
    async fn delete(&self, id: &CompanyId) -> RepositoryResult<()>;
}

// ==========================================
// DepartmentStore Trait
// ==========================================
// 实现者: DepartmentRepository（使用 rusqlite）
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// 按 (会社 ID, 部署名) 精确查询
    async fn find_by_company_and_name(
        &self,
        company_id: &CompanyId,
        name: &str,
    ) -> RepositoryResult<Option<DepartmentId>>;

    /// 在指定会社下创建部署，返回新 ID
    async fn create(&self, company_id: &CompanyId, name: &str) -> RepositoryResult<DepartmentId>;

    /// 删除部署（仅用于导入失败后的补偿）
    async fn delete(&self, id: &DepartmentId) -> RepositoryResult<()>;
}

// ==========================================
// EmployeeStore Trait
// ==========================================
// 实现者: EmployeeRepository（使用 rusqlite）
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// 批量插入社员（单事务，全部成功或全部回滚）
    ///
    /// # 返回
    /// - Ok(usize): 插入条数
    /// - Err: 约束违反等（整个事务回滚，constraint_code() 给出分类）
    async fn insert_many(&self, records: &[EmployeeRecord]) -> RepositoryResult<usize>;
}

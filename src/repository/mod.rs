// ==========================================
// 社員名簿管理 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供会社/部署/社员数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod company_repo;
pub mod department_repo;
pub mod directory_store;
pub mod employee_repo;
pub mod error;

// 重导出核心仓储
pub use company_repo::CompanyRepository;
pub use department_repo::DepartmentRepository;
pub use directory_store::{CompanyStore, DepartmentStore, EmployeeStore};
pub use employee_repo::EmployeeRepository;
pub use error::{ConstraintCode, RepositoryError, RepositoryResult};

// ==========================================
// 社員名簿管理 - 批量提交协调器
// ==========================================
// 职责:
// - 整批社员单次入库（全部成功或全部失败）
// - 失败分类: 唯一约束 → 邮箱重复；其他 → 登録失敗
// - 可选补偿: 删除本次导入新建的部署/会社
// ==========================================

use crate::domain::{CompanyId, DepartmentId, EmployeeRecord};
use crate::i18n::t_in;
use crate::importer::call_guard::{CallGuard, Interruption};
use crate::repository::{CompanyStore, ConstraintCode, DepartmentStore, EmployeeStore};
use tracing::{error, info, warn};

// ==========================================
// CommitFailure - 提交失败分类
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitFailure {
    /// 邮箱唯一约束违反（批内重复或与既存记录重复）
    DuplicateEmail { detail: String },
    /// 其他存储拒绝
    Rejected {
        code: ConstraintCode,
        detail: String,
    },
    /// 取消或超时
    Interrupted(Interruption),
}

impl CommitFailure {
    /// 面向用户的批次级消息
    pub fn user_message(&self, locale: &str) -> String {
        match self {
            CommitFailure::DuplicateEmail { .. } => t_in(locale, "import.duplicate_email"),
            CommitFailure::Rejected { .. } => t_in(locale, "import.commit_failed"),
            CommitFailure::Interrupted(interruption) => interruption.user_message(locale),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { count: usize },
    Failed(CommitFailure),
}

// ==========================================
// CommitCoordinator
// ==========================================
pub struct CommitCoordinator<'a, E: ?Sized> {
    employees: &'a E,
    guard: &'a CallGuard,
}

impl<'a, E> CommitCoordinator<'a, E>
where
    E: EmployeeStore + ?Sized,
{
    pub fn new(employees: &'a E, guard: &'a CallGuard) -> Self {
        Self { employees, guard }
    }

    /// 单次批量写入
    ///
    /// # 说明
    /// - 空批次不调用存储，直接视为成功
    /// - 写入前检查取消；写入中超时/取消以 Interrupted 返回
    pub async fn commit(&self, records: &[EmployeeRecord]) -> CommitOutcome {
        if records.is_empty() {
            return CommitOutcome::Committed { count: 0 };
        }

        let result = match self.guard.run(self.employees.insert_many(records)).await {
            Ok(result) => result,
            Err(interruption) => {
                warn!(records = records.len(), reason = %interruption, "社员批量写入被中断");
                return CommitOutcome::Failed(CommitFailure::Interrupted(interruption));
            }
        };

        match result {
            Ok(count) => {
                info!(count, "社员批量写入成功");
                CommitOutcome::Committed { count }
            }
            Err(e) => {
                let code = e.constraint_code();
                let detail = e.detail();
                error!(
                    records = records.len(),
                    sqlstate = code.sqlstate().unwrap_or("-"),
                    detail = %detail,
                    "社员批量写入失败"
                );
                if code == ConstraintCode::UniqueViolation {
                    CommitOutcome::Failed(CommitFailure::DuplicateEmail { detail })
                } else {
                    CommitOutcome::Failed(CommitFailure::Rejected { code, detail })
                }
            }
        }
    }
}

// ==========================================
// 补偿: 删除本次导入新建的父记录
// ==========================================
// 顺序: 先部署后会社（部署引用会社）
// 失败只记日志，不影响导入结果
pub async fn compensate<C, D>(
    companies: &C,
    departments: &D,
    created_companies: &[CompanyId],
    created_departments: &[DepartmentId],
) where
    C: CompanyStore + ?Sized,
    D: DepartmentStore + ?Sized,
{
    if created_companies.is_empty() && created_departments.is_empty() {
        return;
    }

    let mut failures = 0usize;

    for id in created_departments.iter().rev() {
        if let Err(e) = departments.delete(id).await {
            failures += 1;
            warn!(department_id = %id, error = %e, "补偿删除部署失败");
        }
    }

    for id in created_companies.iter().rev() {
        if let Err(e) = companies.delete(id).await {
            failures += 1;
            warn!(company_id = %id, error = %e, "补偿删除会社失败");
        }
    }

    info!(
        departments = created_departments.len(),
        companies = created_companies.len(),
        failures,
        "补偿删除完成"
    );
}

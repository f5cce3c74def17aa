// ==========================================
// 内存版存储 - 用于导入器集成测试
// ==========================================
// 记录每类调用次数，用于验证「同名只创建一次」「校验失败零写入」
// ==========================================

use async_trait::async_trait;
use employee_directory::domain::{CompanyId, DepartmentId, EmployeeRecord};
use employee_directory::repository::{
    CompanyStore, DepartmentStore, EmployeeStore, RepositoryError, RepositoryResult,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ==========================================
// FakeCompanyStore
// ==========================================
#[derive(Default)]
pub struct FakeCompanyStore {
    rows: Mutex<Vec<(String, CompanyId)>>,
    next_id: AtomicUsize,
    pub find_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    create_delay: Mutex<Option<Duration>>,
}

impl FakeCompanyStore {
    pub fn with_existing(names: &[&str]) -> Self {
        let store = Self::default();
        for name in names {
            store.insert(name);
        }
        store
    }

    /// 延迟 create 调用（超时/取消测试用）
    pub fn delay_create(self, delay: Duration) -> Self {
        *self.create_delay.lock().unwrap() = Some(delay);
        self
    }

    fn insert(&self, name: &str) -> CompanyId {
        let id = CompanyId(format!("company-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.rows.lock().unwrap().push((name.to_string(), id.clone()));
        id
    }

    pub fn id_of(&self, name: &str) -> Option<CompanyId> {
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|(n, _)| n == name).map(|(_, id)| id.clone())
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompanyStore for FakeCompanyStore {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<CompanyId>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.id_of(name))
    }

    async fn create(&self, name: &str) -> RepositoryResult<CompanyId> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.id_of(name).is_some() {
            return Err(RepositoryError::UniqueConstraintViolation(format!(
                "UNIQUE constraint failed: companies.company_name ({})",
                name
            )));
        }
        Ok(self.insert(name))
    }

    async fn delete(&self, id: &CompanyId) -> RepositoryResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(_, existing)| existing != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound {
                entity: "Company".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// FakeDepartmentStore
// ==========================================
#[derive(Default)]
pub struct FakeDepartmentStore {
    rows: Mutex<Vec<(CompanyId, String, DepartmentId)>>,
    next_id: AtomicUsize,
    pub find_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeDepartmentStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, company_id: &CompanyId, name: &str) -> Option<DepartmentId> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|(c, n, _)| c == company_id && n == name)
            .map(|(_, _, id)| id.clone())
    }
}

#[async_trait]
impl DepartmentStore for FakeDepartmentStore {
    async fn find_by_company_and_name(
        &self,
        company_id: &CompanyId,
        name: &str,
    ) -> RepositoryResult<Option<DepartmentId>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(company_id, name))
    }

    async fn create(&self, company_id: &CompanyId, name: &str) -> RepositoryResult<DepartmentId> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.lookup(company_id, name).is_some() {
            return Err(RepositoryError::UniqueConstraintViolation(
                "UNIQUE constraint failed: departments.company_id, departments.department_name"
                    .to_string(),
            ));
        }
        let id = DepartmentId(format!("department-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.rows
            .lock()
            .unwrap()
            .push((company_id.clone(), name.to_string(), id.clone()));
        Ok(id)
    }

    async fn delete(&self, id: &DepartmentId) -> RepositoryResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().retain(|(_, _, existing)| existing != id);
        Ok(())
    }
}

// ==========================================
// FakeEmployeeStore
// ==========================================
// insert_many 为原子操作: 邮箱与既存记录或批内重复时整批拒绝
#[derive(Default)]
pub struct FakeEmployeeStore {
    rows: Mutex<Vec<EmployeeRecord>>,
    pub insert_calls: AtomicUsize,
    failure: Mutex<Option<RepositoryError>>,
}

impl FakeEmployeeStore {
    pub fn failing_with(error: RepositoryError) -> Self {
        let store = Self::default();
        *store.failure.lock().unwrap() = Some(error);
        store
    }

    pub fn records(&self) -> Vec<EmployeeRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn inserts(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmployeeStore for FakeEmployeeStore {
    async fn insert_many(&self, records: &[EmployeeRecord]) -> RepositoryResult<usize> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failure.lock().unwrap().take() {
            return Err(error);
        }

        let mut rows = self.rows.lock().unwrap();
        let mut seen: HashSet<String> = rows.iter().map(|r| r.email.clone()).collect();
        for record in records {
            if !seen.insert(record.email.clone()) {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "UNIQUE constraint failed: employees.email ({})",
                    record.email
                )));
            }
        }

        rows.extend_from_slice(records);
        Ok(records.len())
    }
}

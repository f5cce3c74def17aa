// ==========================================
// 社員名簿管理 - 部署 Repository
// ==========================================
// 职责: departments 表数据访问（rusqlite）
// 约束: (company_id, department_name) 唯一
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{CompanyId, DepartmentId};
use crate::repository::directory_store::DepartmentStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub struct DepartmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 指定会社下的部署数
    pub fn count_by_company(&self, company_id: &CompanyId) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM departments WHERE company_id = ?1",
            params![company_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[async_trait]
impl DepartmentStore for DepartmentRepository {
    async fn find_by_company_and_name(
        &self,
        company_id: &CompanyId,
        name: &str,
    ) -> RepositoryResult<Option<DepartmentId>> {
        let conn = self.get_conn()?;
        let id = conn
            .query_row(
                "SELECT id FROM departments WHERE company_id = ?1 AND department_name = ?2",
                params![company_id.as_str(), name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(id.map(DepartmentId))
    }

    async fn create(&self, company_id: &CompanyId, name: &str) -> RepositoryResult<DepartmentId> {
        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO departments (id, company_id, department_name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
            params![id, company_id.as_str(), name, now],
        )?;
        Ok(DepartmentId(id))
    }

    async fn delete(&self, id: &DepartmentId) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM departments WHERE id = ?1", params![id.as_str()])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Department".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::repository::company_repo::CompanyRepository;
    use crate::repository::directory_store::CompanyStore;
    use crate::repository::error::ConstraintCode;

    fn setup() -> (CompanyRepository, DepartmentRepository) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (
            CompanyRepository::from_connection(conn.clone()),
            DepartmentRepository::from_connection(conn),
        )
    }

    #[tokio::test]
    async fn test_same_name_under_different_companies_is_distinct() {
        let (companies, departments) = setup();
        let a = companies.create("A社").await.unwrap();
        let b = companies.create("B社").await.unwrap();

        let sales_a = departments.create(&a, "営業部").await.unwrap();
        let sales_b = departments.create(&b, "営業部").await.unwrap();

        assert_ne!(sales_a, sales_b);
        assert_eq!(
            departments.find_by_company_and_name(&a, "営業部").await.unwrap(),
            Some(sales_a)
        );
        assert_eq!(departments.count_by_company(&b).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_company_is_foreign_key_violation() {
        let (_companies, departments) = setup();

        let err = departments
            .create(&CompanyId("missing".to_string()), "営業部")
            .await
            .unwrap_err();
        assert_eq!(err.constraint_code(), ConstraintCode::ForeignKeyViolation);
    }
}

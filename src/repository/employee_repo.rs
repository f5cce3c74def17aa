// ==========================================
// 社員名簿管理 - 社员 Repository
// ==========================================
// 职责: employees 表数据访问（rusqlite）
// 约束: email 唯一；批量插入为单事务
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::EmployeeRecord;
use crate::repository::directory_store::EmployeeStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
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

    /// 在事务中批量插入
    fn insert_many_tx(tx: &Transaction, records: &[EmployeeRecord]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO employees (
                id, company_id, department_id, last_name, first_name,
                email, position, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )?;

        let now = Utc::now().to_rfc3339();
        let mut count = 0;
        for record in records {
            stmt.execute(params![
                Uuid::new_v4().to_string(),
                record.company_id.as_str(),
                record.department_id.as_ref().map(|d| d.as_str()),
                record.last_name,
                record.first_name,
                record.email,
                record.position,
                now,
            ])?;
            count += 1;
        }

        Ok(count)
    }

    /// 社员总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 按邮箱查询（返回会社 ID 与部署 ID）
    pub fn find_refs_by_email(
        &self,
        email: &str,
    ) -> RepositoryResult<Option<(String, Option<String>)>> {
        let conn = self.get_conn()?;
        let refs = conn
            .query_row(
                "SELECT company_id, department_id FROM employees WHERE email = ?1",
                params![email],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;
        Ok(refs)
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    /// 批量插入（事务化，任一失败整体回滚）
    async fn insert_many(&self, records: &[EmployeeRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let count = Self::insert_many_tx(&tx, records)?;

        tx.commit()?;
        Ok(count)
    }
}

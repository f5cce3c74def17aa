// ==========================================
// 社員名簿管理 - 会社 Repository
// ==========================================
// 职责: companies 表数据访问（rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::CompanyId;
use crate::repository::directory_store::CompanyStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

// ==========================================
// CompanyRepository
// ==========================================
pub struct CompanyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CompanyRepository {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与其他 Repository 共用同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 会社总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<CompanyId>> {
        let conn = self.get_conn()?;
        let id = conn
            .query_row(
                "SELECT id FROM companies WHERE company_name = ?1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(id.map(CompanyId))
    }

    async fn create(&self, name: &str) -> RepositoryResult<CompanyId> {
        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO companies (id, company_name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![id, name, now],
        )?;
        Ok(CompanyId(id))
    }

    async fn delete(&self, id: &CompanyId) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM companies WHERE id = ?1", params![id.as_str()])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Company".to_string(),
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
    use crate::repository::error::ConstraintCode;

    fn setup() -> CompanyRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        CompanyRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_create_then_find_by_exact_name() {
        let repo = setup();

        assert_eq!(repo.find_by_name("株式会社テスト").await.unwrap(), None);

        let id = repo.create("株式会社テスト").await.unwrap();
        assert_eq!(repo.find_by_name("株式会社テスト").await.unwrap(), Some(id));
        assert_eq!(repo.find_by_name("株式会社テスト ").await.unwrap(), None);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let repo = setup();
        repo.create("A社").await.unwrap();

        let err = repo.create("A社").await.unwrap_err();
        assert_eq!(err.constraint_code(), ConstraintCode::UniqueViolation);
    }

    #[tokio::test]
    async fn test_delete_missing_company_is_not_found() {
        let repo = setup();
        let id = repo.create("A社").await.unwrap();

        repo.delete(&id).await.unwrap();
        assert!(matches!(
            repo.delete(&id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }
}

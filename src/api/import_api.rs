// ==========================================
// 社員名簿管理 - 社员导入API
// ==========================================
// 职责: 面向 UI 层的导入入口
// - 文件类型限制（.csv / .xlsx / .xls）
// - 组装 SQLite 存储 + 配置快照 + 导入器
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportSettings};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::ImportResult;
use crate::i18n::t_in;
use crate::importer::{EmployeeImporter, EmployeeImporterImpl, UniversalFileParser};
use crate::repository::{CompanyRepository, DepartmentRepository, EmployeeRepository};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type SqliteEmployeeImporter =
    EmployeeImporterImpl<CompanyRepository, DepartmentRepository, EmployeeRepository>;

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    importer: SqliteEmployeeImporter,
    config: ConfigManager,
}

impl ImportApi {
    /// 打开数据库并初始化导入器
    ///
    /// # 说明
    /// - 自动建表（幂等）
    /// - 配置在此时读取一次，之后的导入均使用该快照
    pub async fn new(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;
        Self::from_connection(Arc::new(Mutex::new(conn))).await
    }

    /// 从已有连接创建（所有存储共享同一连接）
    pub async fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ApiError::DatabaseConnectionError(format!("锁获取失败: {}", e)))?;
            init_schema(&guard)?;
        }

        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        match config.get_config_snapshot() {
            Ok(snapshot) => debug!(config = %snapshot, "config_kv 快照"),
            Err(e) => warn!(error = %e, "读取配置快照失败"),
        }
        let settings = ImportSettings::load(&config).await;
        info!(
            store_timeout_ms = settings.store_timeout.as_millis() as u64,
            compensate = settings.compensate_on_commit_failure,
            locale = %settings.message_locale,
            "导入配置已加载"
        );

        let importer = EmployeeImporterImpl::with_parser(
            CompanyRepository::from_connection(conn.clone()),
            DepartmentRepository::from_connection(conn.clone()),
            EmployeeRepository::from_connection(conn),
            settings,
            Box::new(UniversalFileParser),
        );

        Ok(Self { importer, config })
    }

    pub fn settings(&self) -> &ImportSettings {
        self.importer.settings()
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// 文件类型检查
    pub fn check_file_type(&self, path: &Path) -> ApiResult<()> {
        if UniversalFileParser::is_supported(path) {
            Ok(())
        } else {
            warn!(file = %path.display(), "拒绝不支持的文件类型");
            Err(ApiError::UnsupportedFileType(t_in(
                &self.settings().message_locale,
                "import.unsupported_format",
            )))
        }
    }

    /// 导入社员文件
    ///
    /// # 返回
    /// - Ok(ImportResult): 导入结果（成功或失败均在其中）
    /// - Err(UnsupportedFileType): 文件类型不支持，未开始导入
    pub async fn import_employees(&self, file_path: &str) -> ApiResult<ImportResult> {
        self.import_employees_with_cancel(file_path, CancellationToken::new())
            .await
    }

    /// 导入社员文件（可取消）
    pub async fn import_employees_with_cancel(
        &self,
        file_path: &str,
        cancel: CancellationToken,
    ) -> ApiResult<ImportResult> {
        let path = Path::new(file_path);
        self.check_file_type(path)?;
        Ok(self.importer.import_file_with_cancel(path, cancel).await)
    }

    /// 批量导入多个文件（任一文件类型不支持则整体拒绝）
    pub async fn import_employee_files(&self, file_paths: &[String]) -> ApiResult<Vec<ImportResult>> {
        if file_paths.is_empty() {
            return Err(ApiError::InvalidInput("文件列表不能为空".to_string()));
        }

        let paths: Vec<PathBuf> = file_paths.iter().map(PathBuf::from).collect();
        for path in &paths {
            self.check_file_type(path)?;
        }

        Ok(self.importer.batch_import(paths).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn api() -> ImportApi {
        let conn = Connection::open_in_memory().unwrap();
        ImportApi::from_connection(Arc::new(Mutex::new(conn)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_rejects_unsupported_file_type() {
        let api = api().await;

        let err = api.import_employees("employees.txt").await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFileType(msg) if msg == "CSV または Excel（.xlsx / .xls）ファイルを選択してください"));
    }

    #[tokio::test]
    async fn test_default_settings_loaded() {
        let api = api().await;
        assert_eq!(api.settings(), &ImportSettings::default());
    }

    #[tokio::test]
    async fn test_empty_file_list_is_invalid() {
        let api = api().await;
        assert!(matches!(
            api.import_employee_files(&[]).await,
            Err(ApiError::InvalidInput(_))
        ));
    }
}

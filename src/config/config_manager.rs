// ==========================================
// 社員名簿管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::config::import_settings::{
    DEFAULT_ERROR_DELIMITER, DEFAULT_MESSAGE_LOCALE, DEFAULT_STORE_TIMEOUT_MS,
};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 导入开始时写入日志，便于事后追溯当次导入使用的配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

// ==========================================
// ImportConfigReader 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_store_timeout_ms(&self) -> Result<u64, Box<dyn Error>> {
        let default = DEFAULT_STORE_TIMEOUT_MS.to_string();
        let value = self.get_config_or_default(config_keys::STORE_TIMEOUT_MS, &default)?;
        let ms = value
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("{} 非法值 '{}': {}", config_keys::STORE_TIMEOUT_MS, value, e))?;
        Ok(ms)
    }

    async fn get_compensate_on_commit_failure(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::COMPENSATE_ON_COMMIT_FAILURE, "false")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(format!(
                "{} 非法值 '{}'",
                config_keys::COMPENSATE_ON_COMMIT_FAILURE, value
            )
            .into()),
        }
    }

    async fn get_message_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::MESSAGE_LOCALE, DEFAULT_MESSAGE_LOCALE)?;
        Ok(value.trim().to_string())
    }

    async fn get_error_delimiter(&self) -> Result<String, Box<dyn Error>> {
        // 连接符允许包含空白，不做 TRIM
        self.get_config_or_default(config_keys::ERROR_DELIMITER, DEFAULT_ERROR_DELIMITER)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 存储调用
    pub const STORE_TIMEOUT_MS: &str = "import_store_timeout_ms";

    // 入库失败补偿
    pub const COMPENSATE_ON_COMMIT_FAILURE: &str = "import_compensate_on_commit_failure";

    // 错误消息
    pub const MESSAGE_LOCALE: &str = "import_message_locale";
    pub const ERROR_DELIMITER: &str = "import_error_delimiter";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportSettings;
    use crate::db::{configure_sqlite_connection, init_schema};
    use std::time::Duration;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_table_is_empty() {
        let manager = setup();

        assert_eq!(manager.get_store_timeout_ms().await.unwrap(), DEFAULT_STORE_TIMEOUT_MS);
        assert!(!manager.get_compensate_on_commit_failure().await.unwrap());
        assert_eq!(manager.get_message_locale().await.unwrap(), "ja");
        assert_eq!(manager.get_error_delimiter().await.unwrap(), ", ");
    }

    #[tokio::test]
    async fn test_overrides_flow_into_settings() {
        let manager = setup();
        manager.set_global_config_value(config_keys::STORE_TIMEOUT_MS, "250").unwrap();
        manager
            .set_global_config_value(config_keys::COMPENSATE_ON_COMMIT_FAILURE, "TRUE")
            .unwrap();
        manager.set_global_config_value(config_keys::MESSAGE_LOCALE, "en").unwrap();

        let settings = ImportSettings::load(&manager).await;

        assert_eq!(settings.store_timeout, Duration::from_millis(250));
        assert!(settings.compensate_on_commit_failure);
        assert_eq!(settings.message_locale, "en");
    }

    #[tokio::test]
    async fn test_malformed_values_are_errors_and_settings_fall_back() {
        let manager = setup();
        manager.set_global_config_value(config_keys::STORE_TIMEOUT_MS, "10秒").unwrap();
        manager
            .set_global_config_value(config_keys::COMPENSATE_ON_COMMIT_FAILURE, "abc")
            .unwrap();

        assert!(manager.get_store_timeout_ms().await.is_err());
        assert!(manager.get_compensate_on_commit_failure().await.is_err());

        let settings = ImportSettings::load(&manager).await;
        assert_eq!(settings.store_timeout, Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS));
        assert!(!settings.compensate_on_commit_failure);
    }

    #[test]
    fn test_config_snapshot_contains_overrides() {
        let manager = setup();
        manager.set_global_config_value(config_keys::ERROR_DELIMITER, " / ").unwrap();

        let snapshot = manager.get_config_snapshot().unwrap();
        let parsed: HashMap<String, String> = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(parsed.get(config_keys::ERROR_DELIMITER).map(String::as_str), Some(" / "));
    }
}

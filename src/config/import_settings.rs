// ==========================================
// 社員名簿管理 - 导入配置快照
// ==========================================
// 职责: 一次性读取 ImportConfigReader，供单个导入器整个生命周期使用
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use std::time::Duration;
use tracing::warn;

/// 默认存储调用超时（毫秒）
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;

/// 默认消息语言
pub const DEFAULT_MESSAGE_LOCALE: &str = "ja";

/// 默认字段错误连接符
pub const DEFAULT_ERROR_DELIMITER: &str = ", ";

/// 支持的消息语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["ja", "en"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub store_timeout: Duration,
    pub compensate_on_commit_failure: bool,
    pub message_locale: String,
    pub error_delimiter: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            compensate_on_commit_failure: false,
            message_locale: DEFAULT_MESSAGE_LOCALE.to_string(),
            error_delimiter: DEFAULT_ERROR_DELIMITER.to_string(),
        }
    }
}

impl ImportSettings {
    /// 从配置读取器加载；读取失败或值非法时回退默认值
    pub async fn load<C: ImportConfigReader + ?Sized>(reader: &C) -> Self {
        let defaults = Self::default();

        let store_timeout = match reader.get_store_timeout_ms().await {
            Ok(ms) if ms > 0 => Duration::from_millis(ms),
            Ok(_) => {
                warn!("import_store_timeout_ms 必须大于 0，使用默认值");
                defaults.store_timeout
            }
            Err(e) => {
                warn!(error = %e, "读取 import_store_timeout_ms 失败，使用默认值");
                defaults.store_timeout
            }
        };

        let compensate_on_commit_failure = match reader.get_compensate_on_commit_failure().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "读取 import_compensate_on_commit_failure 失败，使用默认值");
                defaults.compensate_on_commit_failure
            }
        };

        let message_locale = match reader.get_message_locale().await {
            Ok(locale) if SUPPORTED_LOCALES.contains(&locale.as_str()) => locale,
            Ok(locale) => {
                warn!(locale = %locale, "不支持的消息语言，使用默认值");
                defaults.message_locale.clone()
            }
            Err(e) => {
                warn!(error = %e, "读取 import_message_locale 失败，使用默认值");
                defaults.message_locale.clone()
            }
        };

        let error_delimiter = match reader.get_error_delimiter().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "读取 import_error_delimiter 失败，使用默认值");
                defaults.error_delimiter.clone()
            }
        };

        Self {
            store_timeout,
            compensate_on_commit_failure,
            message_locale,
            error_delimiter,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate_on_commit_failure = enabled;
        self
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.message_locale = locale.to_string();
        self
    }
}

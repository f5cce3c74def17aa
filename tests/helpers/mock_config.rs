// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use employee_directory::config::ImportConfigReader;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub store_timeout_ms: u64,
    pub compensate_on_commit_failure: bool,
    pub message_locale: String,
    pub error_delimiter: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 10_000,
            compensate_on_commit_failure: false,
            message_locale: "ja".to_string(),
            error_delimiter: ", ".to_string(),
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_store_timeout_ms(&self) -> Result<u64, Box<dyn Error>> {
        Ok(self.store_timeout_ms)
    }

    async fn get_compensate_on_commit_failure(&self) -> Result<bool, Box<dyn Error>> {
        Ok(self.compensate_on_commit_failure)
    }

    async fn get_message_locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.message_locale.clone())
    }

    async fn get_error_delimiter(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.error_delimiter.clone())
    }
}

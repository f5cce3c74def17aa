// ==========================================
// 社員名簿管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取单次存储调用超时（毫秒）
    ///
    /// # 默认值
    /// - 10000
    async fn get_store_timeout_ms(&self) -> Result<u64, Box<dyn Error>>;

    /// 入库失败后是否删除本次导入新建的会社/部署
    ///
    /// # 默认值
    /// - false（保留孤立的会社/部署，尽力而为语义）
    async fn get_compensate_on_commit_failure(&self) -> Result<bool, Box<dyn Error>>;

    /// 获取错误消息语言
    ///
    /// # 返回
    /// - "ja" 或 "en"
    ///
    /// # 默认值
    /// - "ja"
    async fn get_message_locale(&self) -> Result<String, Box<dyn Error>>;

    /// 获取同一行多条字段错误的连接符
    ///
    /// # 默认值
    /// - ", "
    async fn get_error_delimiter(&self) -> Result<String, Box<dyn Error>>;
}

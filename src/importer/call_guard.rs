// ==========================================
// 社員名簿管理 - 存储调用守卫
// ==========================================
// 职责: 为每次存储调用附加超时与取消
// 工具: tokio::time::timeout + tokio_util CancellationToken
// ==========================================

use crate::i18n::t_in;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// 存储调用被中断的原因
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    #[error("导入已取消")]
    Cancelled,

    #[error("存储调用超时 ({0:?})")]
    TimedOut(Duration),
}

impl Interruption {
    /// 面向用户的消息
    pub fn user_message(&self, locale: &str) -> String {
        match self {
            Interruption::Cancelled => t_in(locale, "import.cancelled"),
            Interruption::TimedOut(_) => t_in(locale, "import.timeout"),
        }
    }
}

// ==========================================
// CallGuard
// ==========================================
// 单次导入内共享；取消令牌由调用方持有
#[derive(Debug, Clone)]
pub struct CallGuard {
    timeout: Duration,
    cancel: CancellationToken,
}

impl CallGuard {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    /// 已取消时立即返回 Err
    pub fn check(&self) -> Result<(), Interruption> {
        if self.cancel.is_cancelled() {
            Err(Interruption::Cancelled)
        } else {
            Ok(())
        }
    }

    /// 在超时与取消约束下执行一次存储调用
    pub async fn run<F, T>(&self, call: F) -> Result<T, Interruption>
    where
        F: Future<Output = T>,
    {
        self.check()?;

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interruption::Cancelled),
            result = tokio::time::timeout(self.timeout, call) => {
                result.map_err(|_| Interruption::TimedOut(self.timeout))
            }
        }
    }
}

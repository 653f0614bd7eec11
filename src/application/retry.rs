//! Retry Policy - 显式重试策略
//!
//! 替代装饰器式重试：策略是一个值，由调用方套在对话生成调用外面。
//! 指数退避，延迟封顶。

use std::future::Future;
use std::time::Duration;

/// 重试策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 总尝试次数（含首次）
    pub max_attempts: u32,
    /// 首次重试前的延迟
    pub base_delay: Duration,
    /// 延迟上限
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// 对话生成的默认策略：3 次尝试，4s 起步指数退避，封顶 10s
    pub fn dialogue_default() -> Self {
        Self::new(3, Duration::from_secs(4), Duration::from_secs(10))
    }

    /// 第 `attempt` 次失败后的退避延迟（attempt 从 1 开始）
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// 执行 `op` 直到成功或尝试次数耗尽，返回最后一次的错误
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

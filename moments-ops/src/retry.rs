//! 網絡請求重試機制模組
//!
//! 實現指數退避（Exponential Backoff）策略，用於處理臨時網絡故障。
//! 只用於只讀 RPC 調用；交易執行不自動重試。

use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 重試配置
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// 最大重試次數
    pub max_retries: u32,
    /// 初始延遲時間（毫秒）
    pub initial_delay_ms: u64,
    /// 延遲增長倍數
    pub multiplier: f64,
    /// 最大延遲時間（毫秒）
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 200,
            multiplier: 2.0,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

/// 使用指數退避策略重試操作
///
/// 等價於 [`retry_when`] 並對所有錯誤重試。
///
/// # 範例
///
/// ```no_run
/// use moments_ops::retry::{retry_with_exponential_backoff, RetryConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = RetryConfig::default();
///
/// let price = retry_with_exponential_backoff("reference_gas_price", &config, || async {
///     Ok::<_, anyhow::Error>(750u64)
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_exponential_backoff<F, Fut, T, E>(
    operation_name: &str,
    config: &RetryConfig,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    retry_when(operation_name, config, operation, |_| true).await
}

/// 僅當 `is_retryable` 返回 true 時重試
///
/// # 重試策略
///
/// 1. 初始延遲：`initial_delay_ms`
/// 2. 每次失敗後延遲乘以 `multiplier`
/// 3. 延遲上限：`max_delay_ms`
/// 4. 最大重試次數：`max_retries`
pub async fn retry_when<F, Fut, T, E, P>(
    operation_name: &str,
    config: &RetryConfig,
    operation: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        attempt += 1;

        debug!(
            operation = operation_name,
            attempt = attempt,
            max_attempts = config.max_retries + 1,
            "Executing operation"
        );

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                if !is_retryable(&e) {
                    debug!(operation = operation_name, error = %e, "Error is not retryable");
                    return Err(e);
                }

                if attempt > config.max_retries {
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        error = %e,
                        "Operation failed after all retries"
                    );
                    return Err(e);
                }

                warn!(
                    operation = operation_name,
                    attempt = attempt,
                    delay_ms = delay_ms,
                    error = %e,
                    "Operation failed, retrying..."
                );

                sleep(Duration::from_millis(delay_ms)).await;

                // 指數退避
                delay_ms = ((delay_ms as f64) * config.multiplier) as u64;
                delay_ms = delay_ms.min(config.max_delay_ms);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpsError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 10,
            multiplier: 2.0,
            max_delay_ms: 1000,
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_immediately() {
        let config = RetryConfig::default();

        let result = retry_with_exponential_backoff("test_op", &config, || async {
            Ok::<_, anyhow::Error>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let config = fast_config(3);

        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_exponential_backoff("test_op", &config, || {
            let counter = counter_clone.clone();
            async move {
                let count = counter.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    Err(anyhow::anyhow!("Temporary failure"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_fails_after_max_retries() {
        let config = fast_config(2);

        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_with_exponential_backoff("test_op", &config, || {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(anyhow::anyhow!("Permanent failure"))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3); // 1 initial + 2 retries
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let config = fast_config(5);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_when(
            "get_object",
            &config,
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(OpsError::ObjectNotFound("0x1".to_string()))
                }
            },
            OpsError::is_transient,
        )
        .await;

        assert!(matches!(result, Err(OpsError::ObjectNotFound(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay_ms, 200);
        assert_eq!(config.multiplier, 2.0);

        assert_eq!(RetryConfig::with_max_retries(7).max_retries, 7);
    }
}

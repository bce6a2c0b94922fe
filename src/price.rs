//! Live price acquisition with a caller-owned retry policy.
//!
//! The estimators never call into this module; callers resolve a price
//! first and pass `Option<f64>` along.

use rand::Rng;
use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;
use tokio::time::{sleep, Duration};
use tracing::warn;

use crate::CompassError;

/// Trait for sources of the ADA/USD price.
pub trait PriceSource: Send + Sync {
    fn fetch_usd(&self) -> Result<f64, CompassError>;
}

/// A price known up front.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrice(pub f64);

impl PriceSource for FixedPrice {
    fn fetch_usd(&self) -> Result<f64, CompassError> {
        usable_quote(self.0)
    }
}

/// Only finite, positive quotes count as a live price.
fn usable_quote(usd: f64) -> Result<f64, CompassError> {
    if usd.is_finite() && usd > 0.0 {
        Ok(usd)
    } else {
        Err(CompassError::PriceUnavailable(format!("unusable quote {usd}")))
    }
}

/// Reads a cached CoinGecko `simple/price` response such as
/// `{"cardano":{"usd":0.41}}`.
#[derive(Debug, Clone)]
pub struct FilePriceSource {
    path: PathBuf,
}

#[derive(Deserialize)]
struct SimplePrice {
    cardano: UsdQuote,
}

#[derive(Deserialize)]
struct UsdQuote {
    usd: f64,
}

impl FilePriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PriceSource for FilePriceSource {
    fn fetch_usd(&self) -> Result<f64, CompassError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let quote: SimplePrice = serde_json::from_str(&raw)?;
        usable_quote(quote.cardano.usd)
    }
}

/// Exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as f64 * 2f64.powi(attempt as i32);
        let clamped = base.min(self.max_delay.as_millis() as f64);
        let jitter_range = clamped * self.jitter_factor;
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };
        Duration::from_millis((clamped + jitter).max(0.0) as u64)
    }
}

/// Runs `operation` until it succeeds or the policy is exhausted, returning
/// the last error.
pub async fn retry_async<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, CompassError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CompassError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    total = policy.max_retries + 1,
                    error = %err,
                    ?delay,
                    "retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Resolves the live price, or `None` once every attempt failed.
pub async fn fetch_live_price<S: PriceSource>(source: &S, policy: &RetryPolicy) -> Option<f64> {
    match retry_async(policy, "fetch live price", || async { source.fetch_usd() }).await {
        Ok(price) => Some(price),
        Err(err) => {
            warn!(error = %err, "live price unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter_factor: 0.0,
        }
    }

    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl PriceSource for Flaky {
        fn fetch_usd(&self) -> Result<f64, CompassError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(CompassError::PriceUnavailable("timeout".into()))
            } else {
                Ok(0.42)
            }
        }
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
            jitter_factor: 0.0,
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let source = Flaky {
            failures: 2,
            calls: AtomicU32::new(0),
        };
        let price = fetch_live_price(&source, &fast_policy(3)).await;
        assert_eq!(price, Some(0.42));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let source = Flaky {
            failures: 10,
            calls: AtomicU32::new(0),
        };
        let price = fetch_live_price(&source, &fast_policy(2)).await;
        assert_eq!(price, None);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn reads_cached_simple_price() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cardano":{{"usd":0.41}}}}"#).unwrap();
        let source = FilePriceSource::new(file.path());
        assert_eq!(source.fetch_usd().unwrap(), 0.41);
        assert_eq!(fetch_live_price(&source, &fast_policy(0)).await, Some(0.41));
    }

    #[tokio::test]
    async fn unusable_fixed_prices_are_unavailable() {
        for quote in [0.0, -0.4, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                FixedPrice(quote).fetch_usd(),
                Err(CompassError::PriceUnavailable(_))
            ));
            assert_eq!(fetch_live_price(&FixedPrice(quote), &fast_policy(0)).await, None);
        }
        assert_eq!(fetch_live_price(&FixedPrice(0.4), &fast_policy(0)).await, Some(0.4));
    }

    #[test]
    fn missing_cache_is_an_error() {
        let source = FilePriceSource::new("/nonexistent/compass-price.json");
        assert!(matches!(source.fetch_usd(), Err(CompassError::Io(_))));
    }
}

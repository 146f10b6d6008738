//! Retry bookkeeping for check attempts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry behavior for a single check invocation.
///
/// `jitter_factor` defaults to `0.0` for deterministic test behavior; the
/// demo binary or a production caller may raise it to spread retries across
/// concurrently-failing checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first). `1` means no retry.
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts.
    #[serde(with = "duration_millis")]
    pub base_delay: Duration,
    /// Maximum delay cap.
    #[serde(with = "duration_millis")]
    pub max_delay: Duration,
    /// Jitter factor in `[0.0, 1.0]`. `0.0` disables jitter.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
            jitter_factor: 0.0,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(val: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        val.as_millis().serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        let ms: u64 = u64::deserialize(de)?;
        Ok(Duration::from_millis(ms))
    }
}

/// Record of one failed attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryAttempt {
    /// Zero-indexed attempt number.
    pub attempt: u32,
    /// The error message from this attempt.
    pub error: String,
}

/// Metadata captured across every attempt the runner made for one check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryMetadata {
    /// Total attempts made, including the final (successful or not) one.
    pub total_attempts: u32,
    /// Every attempt that failed with a retryable error before the final one.
    pub failed_attempts: Vec<RetryAttempt>,
    /// Wall-clock time spent across every attempt.
    #[serde(with = "duration_millis")]
    pub total_duration: Duration,
}

/// Compute the backoff delay for a zero-indexed attempt.
///
/// With `jitter_factor == 0.0` (the default), this is deterministic
/// exponential backoff with no randomness — required so retry tests are
/// reproducible.
#[must_use]
pub fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exp = 2u64.saturating_pow(attempt);
    let nominal_ms = (config.base_delay.as_millis() as u64).saturating_mul(exp);
    let capped_ms = nominal_ms.min(config.max_delay.as_millis() as u64);

    let jitter_factor = config.jitter_factor.clamp(0.0, 1.0);
    if jitter_factor <= 0.0 || capped_ms == 0 {
        return Duration::from_millis(capped_ms);
    }

    let jitter_range = (capped_ms as f64 * jitter_factor) as u64;
    if jitter_range == 0 {
        return Duration::from_millis(capped_ms);
    }
    let pseudo = std::time::Instant::now().elapsed().subsec_nanos() as u64;
    let jitter = pseudo.wrapping_mul(attempt as u64 + 1) % jitter_range;
    Duration::from_millis(capped_ms.saturating_sub(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_allows_three_attempts_with_no_jitter() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.jitter_factor, 0.0);
    }

    #[test]
    fn compute_delay_without_jitter_is_deterministic_exponential_backoff() {
        let config = RetryConfig { jitter_factor: 0.0, ..RetryConfig::default() };
        assert_eq!(compute_delay(&config, 0), config.base_delay);
        assert_eq!(compute_delay(&config, 1), config.base_delay * 2);
        assert_eq!(compute_delay(&config, 2), config.base_delay * 4);
    }

    #[test]
    fn compute_delay_is_capped_at_max_delay() {
        let config = RetryConfig { max_delay: Duration::from_millis(60), ..RetryConfig::default() };
        assert_eq!(compute_delay(&config, 10), config.max_delay);
    }
}

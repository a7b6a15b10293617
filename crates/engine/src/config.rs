use std::time::Duration;

use facebytes_core::BatchPairing;

/// Engine configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of concurrent worker tasks (default: `4`).
    pub workers: usize,
    /// Dispatch queue capacity in descriptors (default: `256`).
    pub queue_capacity: usize,
    /// How long `submit` may wait for queue space before failing fast,
    /// in milliseconds (default: `200`).
    pub enqueue_wait_ms: u64,
    /// Per-job execution deadline in seconds; `None` disables the
    /// deadline (default: `300`).
    pub job_deadline_secs: Option<u64>,
    /// Default pairing policy for batch comparison (default: `adjacent`).
    pub pairing: BatchPairing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 256,
            enqueue_wait_ms: 200,
            job_deadline_secs: Some(300),
            pairing: BatchPairing::Adjacent,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default    |
    /// |---------------------|------------|
    /// | `WORKERS`           | `4`        |
    /// | `QUEUE_CAPACITY`    | `256`      |
    /// | `ENQUEUE_WAIT_MS`   | `200`      |
    /// | `JOB_DEADLINE_SECS` | `300` (`0` disables) |
    /// | `BATCH_PAIRING`     | `adjacent` |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let workers: usize = std::env::var("WORKERS")
            .map(|v| v.parse().expect("WORKERS must be a valid usize"))
            .unwrap_or(defaults.workers);

        let queue_capacity: usize = std::env::var("QUEUE_CAPACITY")
            .map(|v| v.parse().expect("QUEUE_CAPACITY must be a valid usize"))
            .unwrap_or(defaults.queue_capacity);

        let enqueue_wait_ms: u64 = std::env::var("ENQUEUE_WAIT_MS")
            .map(|v| v.parse().expect("ENQUEUE_WAIT_MS must be a valid u64"))
            .unwrap_or(defaults.enqueue_wait_ms);

        let job_deadline_secs = std::env::var("JOB_DEADLINE_SECS")
            .map(|v| {
                let secs: u64 = v.parse().expect("JOB_DEADLINE_SECS must be a valid u64");
                (secs > 0).then_some(secs)
            })
            .unwrap_or(defaults.job_deadline_secs);

        let pairing = std::env::var("BATCH_PAIRING")
            .map(|v| v.parse().expect("BATCH_PAIRING must be 'adjacent' or 'all-pairs'"))
            .unwrap_or(defaults.pairing);

        Self {
            workers,
            queue_capacity,
            enqueue_wait_ms,
            job_deadline_secs,
            pairing,
        }
    }

    /// Per-job deadline as a [`Duration`], if enabled.
    pub fn job_deadline(&self) -> Option<Duration> {
        self.job_deadline_secs.map(Duration::from_secs)
    }

    /// Bounded wait applied when the dispatch queue is full.
    pub fn enqueue_wait(&self) -> Duration {
        Duration::from_millis(self.enqueue_wait_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::default();
        assert!(config.workers >= 1);
        assert!(config.queue_capacity >= config.workers);
        assert_eq!(config.pairing, BatchPairing::Adjacent);
    }

    #[test]
    fn deadline_converts_to_duration() {
        let mut config = EngineConfig::default();
        config.job_deadline_secs = Some(10);
        assert_eq!(config.job_deadline(), Some(Duration::from_secs(10)));
        config.job_deadline_secs = None;
        assert_eq!(config.job_deadline(), None);
    }
}

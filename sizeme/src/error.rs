/// Invalid factory configuration.
///
/// Raised synchronously by [`crate::SizeMeOptions::validate`] (and therefore by
/// [`crate::SizeMe::new`]) before any component is mounted. Never raised later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("refreshRate too low: {refresh_rate_ms}ms (minimum {min_ms}ms)")]
    RefreshRateTooLow { refresh_rate_ms: u64, min_ms: u64 },
    #[error("no axis monitored: enable at least one of monitor_width/monitor_height")]
    NoAxisMonitored,
}

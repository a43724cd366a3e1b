use std::time::{Duration, Instant};

/// Pixels scanned between wall-clock samples.
pub const CLOCK_CHECK_STRIDE: u64 = 1024;

/// Shortest gap allowed between two progress callbacks.
pub const MIN_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot of build progress. Purely observational.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanProgress {
    pub processed: u64,
    pub total: u64,
}

impl ScanProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

/// Rate limiter for progress callbacks: `ready` returns true at most once per
/// `interval` of wall time, and never more than once per second.
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    last: Instant,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self::with_exact_interval(interval.max(MIN_PROGRESS_INTERVAL))
    }

    pub(crate) fn with_exact_interval(interval: Duration) -> Self {
        Self { interval, last: Instant::now() }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        let p = ScanProgress { processed: 25, total: 200 };
        assert!((p.percent() - 12.5).abs() < 1e-9);
        assert!(!p.is_complete());
        assert!(ScanProgress { processed: 200, total: 200 }.is_complete());
    }

    #[test]
    fn test_interval_has_one_second_floor() {
        assert_eq!(ProgressThrottle::new(Duration::ZERO).interval(), Duration::from_secs(1));
        assert_eq!(ProgressThrottle::new(Duration::from_millis(999)).interval(), Duration::from_secs(1));
        assert_eq!(ProgressThrottle::new(Duration::from_secs(5)).interval(), Duration::from_secs(5));

        let mut throttle = ProgressThrottle::new(Duration::ZERO);
        assert!(!throttle.ready());
    }

    #[test]
    fn test_zero_interval_always_ready() {
        let mut throttle = ProgressThrottle::with_exact_interval(Duration::ZERO);
        assert!(throttle.ready());
        assert!(throttle.ready());
    }

    #[test]
    fn test_long_interval_suppresses() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(3600));
        assert!(!throttle.ready());
        assert!(!throttle.ready());
    }
}

use std::thread;
use std::time::Duration;

/// Blocking pause between automation steps.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Convert a configured number of seconds into a `Duration`, rounded to the
/// nearest nanosecond. Negative or non-finite values become zero.
pub fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_nanos((value * 1e9).round() as u64)
    } else {
        Duration::ZERO
    }
}

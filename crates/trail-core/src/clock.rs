use instant::Instant;
use std::time::Duration;

/// Monotonic clock measuring from its own creation.
///
/// Backed by `performance.now()` in the browser and the OS clock natively.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    #[inline]
    pub fn now(&self) -> Duration {
        Instant::now().duration_since(self.origin)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//! Time source abstraction
//!
//! Drivers never read the wall clock directly; they are handed a [`Clock`]
//! so handshake deadlines can be driven from a fake clock in tests.

/// Monotonic millisecond clock with a cooperative delay
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;

    /// Wait for roughly `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Check whether `timeout_ms` has elapsed since `start_ms`
    fn has_elapsed(&self, start_ms: u64, timeout_ms: u32) -> bool {
        self.now_ms().saturating_sub(start_ms) >= u64::from(timeout_ms)
    }
}

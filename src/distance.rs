//! Most-recent-wins register for raw rangefinder samples.

use core::sync::atomic::{AtomicU16, Ordering};

/// Single-slot register holding the latest raw distance reading.
///
/// Single-writer (the transport task) / single-reader (the transform step).
/// A new arrival silently replaces an unconsumed value: the sample rate is
/// bounded by the mechanical sweep rate, so there is nothing to queue and
/// nothing to retry.
pub struct DistanceCell {
    raw: AtomicU16,
}

impl DistanceCell {
    pub const fn new() -> Self { Self { raw: AtomicU16::new(0) } }

    /// Store the latest raw reading (unscaled sensor units).
    pub fn store(
        &self,
        raw: u16,
    ) {
        self.raw.store(raw, Ordering::Release);
    }

    /// Read the most recent raw reading.
    pub fn load(&self) -> u16 { self.raw.load(Ordering::Acquire) }
}

impl Default for DistanceCell {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let cell = DistanceCell::new();
        assert_eq!(cell.load(), 0);
    }

    #[test]
    fn test_latest_value_wins() {
        let cell = DistanceCell::new();
        cell.store(42);
        cell.store(57);
        assert_eq!(cell.load(), 57);
        // Reading does not consume; the value stays until replaced.
        assert_eq!(cell.load(), 57);
    }
}

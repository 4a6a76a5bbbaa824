//! Sweep angle tracking shared between event sources and the transform step.
//!
//! The current angle and the two ring cursors form one unit of state: a
//! reader that sees a fresh angle with a stale cursor would plot a sample
//! into the wrong slot. The triad is therefore packed into a single atomic
//! word - every update replaces the whole word, so any `snapshot()` is
//! consistent, including across the full-sweep wrap and the marker reset.
//!
//! Mutators run without a lock; they are interrupt-context events in the
//! hardware and must not block. The clear-cursor bump uses compare-and-swap
//! so a pulse or marker landing mid-bump can never be lost.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::{ENCODER_STEP, FULL_SWEEP, SLOT_COUNT};

// Packed field layout: angle in the low 16 bits, write cursor and clear
// cursor in one byte each above it.
const ANGLE_BITS: u32 = 16;
const CURSOR_BITS: u32 = 8;
const ANGLE_MASK: u32 = (1 << ANGLE_BITS) - 1;
const CURSOR_MASK: u32 = (1 << CURSOR_BITS) - 1;

const _: () = assert!(SLOT_COUNT <= 1 << CURSOR_BITS);
const _: () = assert!((FULL_SWEEP as u32) < (1 << ANGLE_BITS));

/// One consistent view of the sweep state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SweepSnapshot {
    /// Current sweep angle, scaled (see [`crate::config::SCALE`]).
    pub angle: u16,
    /// Ring slot the next sample lands in (`angle / ENCODER_STEP`).
    pub write_index: usize,
    /// Trailing slot the next clear pass erases.
    pub clear_index: usize,
}

/// Owner of the `(angle, write cursor, clear cursor)` triad.
pub struct AngleTracker {
    state: AtomicU32,
}

impl AngleTracker {
    pub const fn new() -> Self { Self { state: AtomicU32::new(0) } }

    const fn pack(
        angle: u16,
        write: usize,
        clear: usize,
    ) -> u32 {
        angle as u32
            | ((write as u32 & CURSOR_MASK) << ANGLE_BITS)
            | ((clear as u32 & CURSOR_MASK) << (ANGLE_BITS + CURSOR_BITS))
    }

    const fn unpack(word: u32) -> SweepSnapshot {
        SweepSnapshot {
            angle: (word & ANGLE_MASK) as u16,
            write_index: ((word >> ANGLE_BITS) & CURSOR_MASK) as usize,
            clear_index: ((word >> (ANGLE_BITS + CURSOR_BITS)) & CURSOR_MASK) as usize,
        }
    }

    /// Apply one encoder pulse: advance the angle and the write cursor.
    ///
    /// Crossing the full-sweep limit zeroes angle and both cursors in the
    /// same store, so even if the once-per-revolution marker is lost the
    /// sweep keeps running.
    pub fn advance(&self) {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let s = Self::unpack(word);
                let angle = s.angle + ENCODER_STEP;
                if angle >= FULL_SWEEP {
                    Some(0)
                } else {
                    Some(Self::pack(angle, (s.write_index + 1) % SLOT_COUNT, s.clear_index))
                }
            })
            .ok();
    }

    /// Absolute-position marker: unconditionally re-zero the triad.
    ///
    /// This is the only drift correction; pulse miscounts accumulated since
    /// the previous marker are discarded here, once per revolution.
    pub fn reset_to_zero(&self) { self.state.store(0, Ordering::Release); }

    /// Read a consistent copy of the triad.
    pub fn snapshot(&self) -> SweepSnapshot { Self::unpack(self.state.load(Ordering::Acquire)) }

    /// Advance the clear cursor one slot along the sweep, returning the slot
    /// to erase.
    ///
    /// Returns `None` once the cursor has caught up, i.e. reached the slot
    /// just past the current write position (the oldest surviving entry).
    /// The write position is re-read on every call, so a wrap or marker
    /// reset landing mid-walk simply redirects the cursor.
    pub fn take_clear_slot(&self) -> Option<usize> {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let s = Self::unpack(word);
                if s.clear_index == (s.write_index + 1) % SLOT_COUNT {
                    None
                } else {
                    Some(Self::pack(s.angle, s.write_index, (s.clear_index + 1) % SLOT_COUNT))
                }
            })
            .ok()
            .map(|previous| Self::unpack(previous).clear_index)
    }
}

impl Default for AngleTracker {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_zeroed() {
        let tracker = AngleTracker::new();
        let s = tracker.snapshot();
        assert_eq!(s.angle, 0);
        assert_eq!(s.write_index, 0);
        assert_eq!(s.clear_index, 0);
    }

    #[test]
    fn test_advance_keeps_write_cursor_quantized() {
        let tracker = AngleTracker::new();
        for pulse in 1..(FULL_SWEEP / ENCODER_STEP) {
            tracker.advance();
            let s = tracker.snapshot();
            assert_eq!(s.angle, pulse * ENCODER_STEP);
            assert_eq!(s.write_index, (s.angle / ENCODER_STEP) as usize);
            assert!(s.write_index < SLOT_COUNT);
        }
    }

    #[test]
    fn test_full_sweep_wraps_triad_in_one_step() {
        let tracker = AngleTracker::new();
        let pulses = FULL_SWEEP / ENCODER_STEP;
        for _ in 0..pulses - 1 {
            tracker.advance();
        }
        // Let the clear cursor move off zero so the wrap visibly resets it too.
        assert!(tracker.take_clear_slot().is_some());
        let before = tracker.snapshot();
        assert_eq!(before.angle, FULL_SWEEP - ENCODER_STEP);
        assert_eq!(before.write_index, pulses as usize - 1);
        assert_eq!(before.clear_index, 1);

        tracker.advance();
        // A single snapshot must observe all three fields reset together.
        assert_eq!(
            tracker.snapshot(),
            SweepSnapshot {
                angle: 0,
                write_index: 0,
                clear_index: 0
            }
        );
    }

    #[test]
    fn test_marker_resets_triad() {
        let tracker = AngleTracker::new();
        for _ in 0..10 {
            tracker.advance();
        }
        while tracker.take_clear_slot().is_some() {}
        tracker.reset_to_zero();
        assert_eq!(
            tracker.snapshot(),
            SweepSnapshot {
                angle: 0,
                write_index: 0,
                clear_index: 0
            }
        );
    }

    #[test]
    fn test_clear_cursor_stops_one_slot_past_write() {
        let tracker = AngleTracker::new();
        for _ in 0..5 {
            tracker.advance();
        }
        let mut cleared = Vec::new();
        while let Some(slot) = tracker.take_clear_slot() {
            cleared.push(slot);
        }
        // Slots 0..=5 erased in cursor order; the cursor rests just past the
        // write position and refuses to advance further.
        assert_eq!(cleared, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(tracker.snapshot().clear_index, 6);
        assert_eq!(tracker.take_clear_slot(), None);
    }

    #[test]
    fn test_clear_cursor_never_overtakes_write() {
        let tracker = AngleTracker::new();
        // Arbitrary interleaving of pulses and partial clear walks, long
        // enough to cross the full-sweep wrap.
        for round in 0..80 {
            for _ in 0..=round % 7 {
                tracker.advance();
            }
            for _ in 0..round % 3 {
                tracker.take_clear_slot();
            }
            // Draining hands out consecutive slots and always parks the
            // cursor exactly one slot past the write position, never beyond.
            let mut previous: Option<usize> = None;
            while let Some(slot) = tracker.take_clear_slot() {
                if let Some(previous) = previous {
                    assert_eq!(slot, (previous + 1) % SLOT_COUNT);
                }
                previous = Some(slot);
            }
            let s = tracker.snapshot();
            assert_eq!(s.clear_index, (s.write_index + 1) % SLOT_COUNT);
        }
    }

    #[test]
    fn test_clear_cursor_follows_wrap() {
        let tracker = AngleTracker::new();
        let pulses = (FULL_SWEEP / ENCODER_STEP) as usize;
        for _ in 0..pulses - 1 {
            tracker.advance();
        }
        while tracker.take_clear_slot().is_some() {}
        assert_eq!(tracker.snapshot().clear_index, pulses);

        // Wrap; the cursor restarts from zero behind the new sweep.
        tracker.advance();
        assert_eq!(tracker.take_clear_slot(), Some(0));
        assert_eq!(tracker.take_clear_slot(), None);
    }
}

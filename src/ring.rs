//! Fixed-capacity ring of plotted echoes, one slot per angular step.
//!
//! The ring holds exactly one revolution's worth of points. Writing is done
//! at the slot the angle tracker's write cursor names; the trailing clear
//! empties slots one revolution later. Slots never allocate and never move.

use embedded_graphics::geometry::Point;

use crate::config::SLOT_COUNT;

/// Per-slot record of a plotted echo: where it was drawn, and the scaled
/// sweep angle the sample was taken at.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SweepPoint {
    pub point: Point,
    pub angle: u16,
}

/// Fixed store of one revolution's worth of plotted points.
///
/// Slots start `None` (never written) and return to `None` when the trailing
/// clear erases them.
pub struct PointRing {
    slots: [Option<SweepPoint>; SLOT_COUNT],
    /// Angle of the immediately preceding sample, for duplicate detection.
    last_angle: Option<u16>,
}

impl PointRing {
    pub const fn new() -> Self {
        Self {
            slots: [None; SLOT_COUNT],
            last_angle: None,
        }
    }

    /// Overwrite `slot` with a freshly plotted echo, returning the entry it
    /// displaces. Also records `angle` as the most recent sample angle.
    pub fn put_point(
        &mut self,
        slot: usize,
        point: Point,
        angle: u16,
    ) -> Option<SweepPoint> {
        let previous = self.slots[slot];
        self.slots[slot] = Some(SweepPoint { point, angle });
        self.last_angle = Some(angle);
        previous
    }

    /// Read the echo stored in `slot`, if any.
    pub const fn get_slot(
        &self,
        slot: usize,
    ) -> Option<SweepPoint> {
        self.slots[slot]
    }

    /// Read and empty `slot` in one step (used by the trailing clear).
    pub fn take_slot(
        &mut self,
        slot: usize,
    ) -> Option<SweepPoint> {
        self.slots[slot].take()
    }

    /// True when `angle` equals the immediately preceding sample's angle.
    ///
    /// Deliberately not a within-revolution dedup: only back-to-back samples
    /// landing on the same slot collapse into a redraw.
    pub fn is_duplicate_angle(
        &self,
        angle: u16,
    ) -> bool {
        self.last_angle == Some(angle)
    }
}

impl Default for PointRing {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ring_is_empty() {
        let ring = PointRing::new();
        for slot in 0..SLOT_COUNT {
            assert_eq!(ring.get_slot(slot), None);
        }
        assert!(!ring.is_duplicate_angle(0));
    }

    #[test]
    fn test_put_then_get_round_trips_every_slot() {
        let mut ring = PointRing::new();
        for slot in 0..SLOT_COUNT {
            let point = Point::new(slot as i32, 2 * slot as i32);
            let angle = slot as u16;
            ring.put_point(slot, point, angle);
            assert_eq!(ring.get_slot(slot), Some(SweepPoint { point, angle }));
        }
        // Earlier slots are untouched by later writes.
        assert_eq!(
            ring.get_slot(0),
            Some(SweepPoint {
                point: Point::new(0, 0),
                angle: 0
            })
        );
    }

    #[test]
    fn test_put_returns_displaced_entry() {
        let mut ring = PointRing::new();
        assert_eq!(ring.put_point(7, Point::new(1, 2), 112), None);
        let displaced = ring.put_point(7, Point::new(3, 4), 112);
        assert_eq!(
            displaced,
            Some(SweepPoint {
                point: Point::new(1, 2),
                angle: 112
            })
        );
    }

    #[test]
    fn test_take_empties_slot() {
        let mut ring = PointRing::new();
        ring.put_point(3, Point::new(9, 9), 48);
        assert!(ring.take_slot(3).is_some());
        assert_eq!(ring.get_slot(3), None);
        assert_eq!(ring.take_slot(3), None);
    }

    #[test]
    fn test_duplicate_tracks_only_immediately_preceding_sample() {
        let mut ring = PointRing::new();
        ring.put_point(5, Point::new(1, 1), 80);
        assert!(ring.is_duplicate_angle(80));

        // An intervening sample at a different angle breaks the match, even
        // though slot 5 still stores angle 80.
        ring.put_point(6, Point::new(2, 2), 96);
        assert!(!ring.is_duplicate_angle(80));
        assert!(ring.is_duplicate_angle(96));
    }
}

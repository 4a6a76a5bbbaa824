//! Paint operations serialized over the shared ring/display pair.
//!
//! Everything here must run inside the single mutual-exclusion domain that
//! guards the point ring and the display surface together: callers lock once,
//! borrow both halves out of the guard, perform exactly one bounded operation,
//! and release. Within one operation, buffer and surface state are mutually
//! consistent; across operations only mutual exclusion is promised.
//!
//! Draw errors are discarded - there is no reporting channel on the scope,
//! and the surface already ignores out-of-bounds writes.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};

use crate::angle::AngleTracker;
use crate::config::{
    BACKGROUND_COLOR,
    BEZEL_COLOR,
    CENTER_X,
    CENTER_Y,
    ECHO_COLOR,
    SCOPE_RADIUS,
    SLOT_COUNT,
};
use crate::ring::PointRing;
use crate::transform::on_screen;

/// Repeat sample at an unchanged angle: erase the superseded pixel for the
/// slot, then draw the replacement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RedrawRequest {
    pub slot: usize,
    /// Pixel of the superseded echo, if the slot held one.
    pub erase: Option<Point>,
}

/// What the render coordinator should do with a freshly transformed sample.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PaintOp {
    /// First sample at this angle: draw it and leave older echoes to the
    /// trailing clear.
    Draw { slot: usize },
    /// Same angle as the immediately preceding sample: redraw in place, so
    /// repeated samples never stack ghost pixels on one slot.
    Redraw(RedrawRequest),
}

/// Store a transformed sample in the ring and classify it.
pub fn submit_sample(
    ring: &mut PointRing,
    slot: usize,
    point: Point,
    angle: u16,
) -> PaintOp {
    let duplicate = ring.is_duplicate_angle(angle);
    let previous = ring.put_point(slot, point, angle);
    if duplicate {
        PaintOp::Redraw(RedrawRequest {
            slot,
            erase: previous.map(|echo| echo.point),
        })
    } else {
        PaintOp::Draw { slot }
    }
}

/// Draw the echo stored in `slot`.
pub fn draw_slot<D>(
    ring: &PointRing,
    display: &mut D,
    slot: usize,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if let Some(echo) = ring.get_slot(slot)
        && on_screen(echo.point)
    {
        Pixel(echo.point, ECHO_COLOR).draw(display).ok();
    }
}

/// Erase the superseded pixel, then draw the replacement echo.
pub fn redraw_slot<D>(
    ring: &PointRing,
    display: &mut D,
    request: RedrawRequest,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if let Some(stale) = request.erase
        && on_screen(stale)
    {
        Pixel(stale, BACKGROUND_COLOR).draw(display).ok();
    }
    draw_slot(ring, display, request.slot);
}

/// Erase stale echoes left by the previous revolution.
///
/// Walks the clear cursor up to one slot past the current write position,
/// repainting each stored point with the background color and emptying its
/// slot. The live cursor triad is re-read every step, so a write-cursor wrap
/// mid-walk is handled; the loop is bounded to one full ring per invocation.
pub fn clear_trailing<D>(
    ring: &mut PointRing,
    tracker: &AngleTracker,
    display: &mut D,
) where
    D: DrawTarget<Color = Rgb565>,
{
    for _ in 0..SLOT_COUNT {
        let Some(slot) = tracker.take_clear_slot() else {
            break;
        };
        if let Some(stale) = ring.take_slot(slot)
            && on_screen(stale.point)
        {
            Pixel(stale.point, BACKGROUND_COLOR).draw(display).ok();
        }
    }
}

/// Paint the idle scope face: cleared background with the bezel ring.
pub fn paint_backdrop<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    display.clear(BACKGROUND_COLOR).ok();
    Circle::with_center(Point::new(CENTER_X, CENTER_Y), SCOPE_RADIUS * 2 + 1)
        .into_styled(PrimitiveStyle::with_stroke(BEZEL_COLOR, 1))
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Sweep and display configuration.
//!
//! Everything here is fixed at compile time; the device keeps no state across
//! restarts and has no runtime configuration surface. Derived values are
//! pre-computed as `const` so the hot paths never repeat the arithmetic.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Fixed-Point Sweep Configuration
// =============================================================================

/// Fixed-point scale factor: fractional degrees are represented as integers
/// multiplied by this (e.g. 1.6 degrees -> 16).
pub const SCALE: u16 = 10;

/// Scaled angular step per encoder pulse (1.6 degrees; 225 pulses per
/// revolution with the fitted encoder disc).
pub const ENCODER_STEP: u16 = 16;

/// Scaled angle of one full revolution. The sweep angle always stays in
/// `[0, FULL_SWEEP)`.
pub const FULL_SWEEP: u16 = 360 * SCALE;

/// Scaled angle of one quadrant, used to fold any angle into the first
/// quadrant for the trig approximations.
pub const QUADRANT_SWEEP: u16 = 90 * SCALE;

/// Scaled half revolution.
pub const HALF_SWEEP: u16 = 180 * SCALE;

/// Encoder pulses per revolution.
pub const PULSES_PER_SWEEP: u16 = FULL_SWEEP / ENCODER_STEP;

// =============================================================================
// Point Ring Buffer
// =============================================================================

/// Ring capacity: one revolution's worth of angular resolution. Slightly more
/// slots than encoder pulses per revolution, so the write cursor never laps
/// the trailing clear cursor between marker events.
pub const SLOT_COUNT: usize = 230;

// =============================================================================
// Display Configuration
// =============================================================================

/// Panel width in pixels (ST7735R, 1.8" TFT).
pub const SCREEN_WIDTH: u32 = 130;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 130;

/// Scope center X coordinate. Pre-computed as i32 to avoid casts in drawing code.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

/// Scope center Y coordinate.
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

/// Radius of the bezel ring painted around the scope face at startup.
pub const SCOPE_RADIUS: u32 = 64;

// =============================================================================
// Colors (from the RgbColor trait - guaranteed optimal values)
// =============================================================================

/// Scope face background; trailing clears repaint echoes with this.
pub const BACKGROUND_COLOR: Rgb565 = Rgb565::BLACK;

/// Detected-echo color.
pub const ECHO_COLOR: Rgb565 = Rgb565::GREEN;

/// Bezel ring color.
pub const BEZEL_COLOR: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Sample Transport
// =============================================================================

/// Baud rate of the rangefinder's serial link (one raw distance byte per sample).
pub const RANGEFINDER_BAUD: u32 = 115_200;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_divides_full_sweep() {
        // The write cursor is advanced once per pulse and derived-equal to
        // angle / ENCODER_STEP; that only holds if pulses tile the sweep.
        assert_eq!(FULL_SWEEP % ENCODER_STEP, 0);
        assert_eq!(PULSES_PER_SWEEP, 225);
    }

    #[test]
    fn test_ring_covers_one_revolution() {
        assert!(SLOT_COUNT >= PULSES_PER_SWEEP as usize);
    }

    #[test]
    fn test_scope_fits_on_panel() {
        assert!(CENTER_X - SCOPE_RADIUS as i32 >= 0);
        assert!(CENTER_X + (SCOPE_RADIUS as i32) < SCREEN_WIDTH as i32);
        assert!(CENTER_Y - SCOPE_RADIUS as i32 >= 0);
        assert!(CENTER_Y + (SCOPE_RADIUS as i32) < SCREEN_HEIGHT as i32);
    }
}

//! Radar scope library - testable modules for the rotating-LIDAR display.
//!
//! This library contains the core logic that can be tested on the host machine.
//! The binary (`main.rs`) uses this library and adds the embedded-specific code:
//! the embassy executor, the peripheral wiring, and the ST7735 panel driver.
//!
//! # Architecture
//!
//! One ranging sample arrives per angular increment of the sensor shaft. The
//! sweep state (`angle`), the sample register (`distance`), and the pure
//! coordinate conversion (`transform`) feed the point ring (`ring`); the
//! paint operations (`scope`) run against the ring and the display surface
//! under a single lock, erasing the previous revolution's echoes as the new
//! sweep overtakes them.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod angle;
pub mod config;
pub mod distance;
pub mod ring;
pub mod scope;
pub mod transform;

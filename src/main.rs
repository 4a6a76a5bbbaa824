//! Rotating-LIDAR radar scope firmware for Raspberry Pi Pico 2 (RP2350).
//!
//! A distance sensor spins on a motor shaft and reports one ranging byte per
//! angular increment. The firmware tracks the shaft angle from encoder
//! pulses, converts each (angle, distance) sample to a screen coordinate, and
//! paints it on an ST7735 TFT while a trailing cursor erases the previous
//! revolution's echoes - a live radar sweep in bounded memory.
//!
//! # Architecture
//!
//! Event tasks mutate lock-free cells and post signals:
//! - Encoder pulse -> advance the sweep triad, request a trailing clear
//! - Position marker -> re-zero the sweep once per revolution
//! - UART byte -> latest-wins distance register, request a transform
//!
//! The transform task is the single step between events and painting. The
//! draw, redraw, and clear workers each block on their own signal and
//! serialize through one mutex guarding the point ring and the panel, so
//! pixel writes never interleave below operation granularity.

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
mod st7735;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::Spi;
use embassy_rp::uart::{self, UartRx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use radar_scope::angle::AngleTracker;
use radar_scope::config::RANGEFINDER_BAUD;
use radar_scope::distance::DistanceCell;
use radar_scope::ring::PointRing;
use radar_scope::scope::{
    PaintOp,
    RedrawRequest,
    clear_trailing,
    draw_slot,
    paint_backdrop,
    redraw_slot,
    submit_sample,
};
use radar_scope::transform::polar_to_screen;

use crate::st7735::St7735;

bind_interrupts!(struct Irqs {
    UART0_IRQ => uart::InterruptHandler<UART0>;
});

// =============================================================================
// Shared State
// =============================================================================

/// Sweep triad: angle plus write/clear cursors, one atomic word.
static TRACKER: AngleTracker = AngleTracker::new();

/// Latest raw distance byte, most-recent-wins.
static DISTANCE: DistanceCell = DistanceCell::new();

/// Everything the drawing workers share: the point ring and the panel.
/// One lock guards both, so buffer and surface state stay mutually
/// consistent within each operation.
struct SharedScope {
    ring: PointRing,
    display: St7735<'static>,
}

type ScopeMutex = Mutex<CriticalSectionRawMutex, SharedScope>;

// =============================================================================
// Work Signals
// =============================================================================
// Each worker blocks on its own signal. Signals collapse unconsumed posts to
// the latest request; like the distance register this is most-recent-wins,
// bounded by the mechanical sweep rate. The clear worker re-reads the live
// cursor, so a collapsed post never loses an erase.

/// A fresh distance byte is waiting for the transform step.
static SAMPLE_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Draw the echo stored in this slot.
static DRAW_REQUEST: Signal<CriticalSectionRawMutex, usize> = Signal::new();

/// Erase-then-draw for a repeat sample at an unchanged angle.
static REDRAW_REQUEST: Signal<CriticalSectionRawMutex, RedrawRequest> = Signal::new();

/// The sweep advanced; walk the trailing clear cursor.
static CLEAR_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

// =============================================================================
// Event Tasks
// =============================================================================

/// One encoder pulse per fixed angular step of the motor shaft.
///
/// Pulses are applied in strict arrival order - each one is a physical tick,
/// and the single edge-await loop can never reorder them.
#[embassy_executor::task]
async fn encoder_task(mut pulse: Input<'static>) {
    info!("Encoder task started");

    loop {
        pulse.wait_for_rising_edge().await;
        TRACKER.advance();
        CLEAR_REQUEST.signal(());
    }
}

/// Once-per-revolution absolute zero reference (beam-break).
///
/// The only drift correction: pulse miscounts since the previous marker are
/// discarded wholesale, not tracked.
#[embassy_executor::task]
async fn marker_task(mut marker: Input<'static>) {
    info!("Marker task started");

    loop {
        marker.wait_for_falling_edge().await;
        TRACKER.reset_to_zero();
    }
}

/// Rangefinder transport: one raw distance byte per sample.
#[embassy_executor::task]
async fn ingest_task(mut rx: UartRx<'static, UART0, uart::Async>) {
    info!("Ingest task started");

    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                DISTANCE.store(u16::from(byte[0]));
                SAMPLE_READY.signal(());
            }
            // Dropped samples are normal operation; the next byte replaces them.
            Err(_) => warn!("rangefinder read error"),
        }
    }
}

// =============================================================================
// Transform Step
// =============================================================================

/// Pair the latest distance with an angle snapshot, convert to a screen
/// coordinate, and hand the result to the right worker.
#[embassy_executor::task]
async fn transform_task(scope: &'static ScopeMutex) {
    info!("Transform task started");

    loop {
        SAMPLE_READY.wait().await;

        let distance = DISTANCE.load();
        let snapshot = TRACKER.snapshot();
        let point = polar_to_screen(snapshot.angle, distance);

        // Short critical section: store the point and classify the sample.
        // The pixel work happens in the workers, outside this lock scope.
        let op = {
            let mut shared = scope.lock().await;
            submit_sample(&mut shared.ring, snapshot.write_index, point, snapshot.angle)
        };

        match op {
            PaintOp::Draw { slot } => DRAW_REQUEST.signal(slot),
            PaintOp::Redraw(request) => REDRAW_REQUEST.signal(request),
        }
    }
}

// =============================================================================
// Drawing Workers
// =============================================================================

/// Draw freshly plotted echoes.
#[embassy_executor::task]
async fn draw_task(scope: &'static ScopeMutex) {
    info!("Draw task started");

    loop {
        let slot = DRAW_REQUEST.wait().await;
        let mut shared = scope.lock().await;
        let SharedScope { ring, display } = &mut *shared;
        draw_slot(ring, display, slot);
    }
}

/// Replace an echo in place when a repeat sample lands on the same angle.
#[embassy_executor::task]
async fn redraw_task(scope: &'static ScopeMutex) {
    info!("Redraw task started");

    loop {
        let request = REDRAW_REQUEST.wait().await;
        let mut shared = scope.lock().await;
        let SharedScope { ring, display } = &mut *shared;
        redraw_slot(ring, display, request);
    }
}

/// Erase the previous revolution's echoes behind the advancing sweep.
#[embassy_executor::task]
async fn clear_task(scope: &'static ScopeMutex) {
    info!("Clear task started");

    loop {
        CLEAR_REQUEST.wait().await;
        let mut shared = scope.lock().await;
        let SharedScope { ring, display } = &mut *shared;
        clear_trailing(ring, &TRACKER, display);
    }
}

// =============================================================================
// Startup
// =============================================================================

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"radar-scope"),
    embassy_rp::binary_info::rp_program_description!(c"Rotating-LIDAR radar scope on ST7735 TFT"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

fn rangefinder_uart_config() -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = RANGEFINDER_BAUD;
    config
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Radar scope starting...");

    let p = embassy_rp::init(Default::default());

    // Display pins: CS=17, DC=16, CLK=18, MOSI=19, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let mut _backlight = Output::new(p.PIN_20, Level::High); // Turn on backlight

    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, st7735::spi_config());
    let mut display = St7735::new(spi, dc, cs);
    display.init().await;
    paint_backdrop(&mut display);
    info!("Display initialized");

    // Sensor inputs: encoder pulse on GPIO2, zero marker on GPIO3, distance
    // bytes on UART0 RX (GPIO1).
    let pulse = Input::new(p.PIN_2, Pull::Up);
    let marker = Input::new(p.PIN_3, Pull::Up);
    let rx = UartRx::new(p.UART0, p.PIN_1, Irqs, p.DMA_CH1, rangefinder_uart_config());

    // Move shared state to a static (embassy tasks need 'static lifetime)
    static SCOPE: StaticCell<ScopeMutex> = StaticCell::new();
    let scope = SCOPE.init(Mutex::new(SharedScope {
        ring: PointRing::new(),
        display,
    }));

    spawner.spawn(encoder_task(pulse)).unwrap();
    spawner.spawn(marker_task(marker)).unwrap();
    spawner.spawn(ingest_task(rx)).unwrap();
    spawner.spawn(transform_task(scope)).unwrap();
    spawner.spawn(draw_task(scope)).unwrap();
    spawner.spawn(redraw_task(scope)).unwrap();
    spawner.spawn(clear_task(scope)).unwrap();
    info!("Workers spawned");

    // Heartbeat on the onboard LED to show the executor is alive.
    let mut led = Output::new(p.PIN_25, Level::Low);
    loop {
        led.toggle();
        Timer::after_millis(500).await;
    }
}

//! Blocking ST7735R driver for the 1.8" 130x130 TFT scope face.
//!
//! The panel is one half of the workers' mutual-exclusion domain: a worker
//! holds the shared lock for exactly one bounded pixel operation, so every
//! transfer here is a short blocking SPI write (no DMA, no framebuffer).
//! Initialization is the only async path - embassy-time delays between the
//! panel bring-up commands.
//!
//! Color is RGB565; each pixel goes out as its high/low byte pair.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use radar_scope::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

// ST7735 commands
const SLPOUT: u8 = 0x11;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const COLMOD: u8 = 0x3A;

/// 16 bits per pixel (RGB565).
const COLMOD_16BPP: u8 = 0x05;

/// SPI configuration for the ST7735R (15 MHz, the panel's rated maximum).
pub fn spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = 15_000_000;
    config
}

/// ST7735R panel behind a TX-only blocking SPI plus DC/CS control pins.
pub struct St7735<'d> {
    spi: Spi<'d, SPI0, Blocking>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> St7735<'d> {
    pub fn new(
        spi: Spi<'d, SPI0, Blocking>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self { spi, dc, cs }
    }

    /// Bring the panel out of sleep and into 16-bit color mode.
    pub async fn init(&mut self) {
        // Exit sleep mode
        self.write_command(SLPOUT);
        Timer::after_millis(120).await;

        // Display on
        self.write_command(DISPON);
        Timer::after_millis(10).await;

        // Set pixel format to RGB565
        self.write_command(COLMOD);
        self.write_data(&[COLMOD_16BPP]);
    }

    /// Send a command byte (DC low, CS low during transfer).
    fn write_command(
        &mut self,
        command: u8,
    ) {
        self.cs.set_low();
        self.dc.set_low();
        self.spi.blocking_write(&[command]).ok();
        self.cs.set_high();
    }

    /// Send data bytes (DC high, CS low during transfer).
    fn write_data(
        &mut self,
        data: &[u8],
    ) {
        self.cs.set_low();
        self.dc.set_high();
        self.spi.blocking_write(data).ok();
        self.cs.set_high();
    }

    /// Address a drawing window; subsequent RAMWR data fills it row-major.
    fn set_window(
        &mut self,
        x0: u8,
        y0: u8,
        x1: u8,
        y1: u8,
    ) {
        self.write_command(CASET);
        self.write_data(&[0x00, x0, 0x00, x1]);
        self.write_command(RASET);
        self.write_data(&[0x00, y0, 0x00, y1]);
    }

    /// Write one pixel. Out-of-bounds coordinates are silently ignored.
    pub fn draw_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if x < 0 || x >= SCREEN_WIDTH as i32 || y < 0 || y >= SCREEN_HEIGHT as i32 {
            return;
        }
        self.set_window(x as u8, y as u8, x as u8, y as u8);
        self.write_command(RAMWR);
        let raw: RawU16 = color.into();
        self.write_data(&raw.into_inner().to_be_bytes());
    }

    /// Fill a rectangle, clipped to the panel edges. Rectangles starting off
    /// the panel are ignored, matching the pixel policy.
    pub fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb565,
    ) {
        if x < 0 || y < 0 || x >= SCREEN_WIDTH as i32 || y >= SCREEN_HEIGHT as i32 {
            return;
        }
        let width = width.min(SCREEN_WIDTH - x as u32);
        let height = height.min(SCREEN_HEIGHT - y as u32);
        if width == 0 || height == 0 {
            return;
        }
        self.set_window(
            x as u8,
            y as u8,
            (x as u32 + width - 1) as u8,
            (y as u32 + height - 1) as u8,
        );
        self.write_command(RAMWR);

        // Stream the pixel pair with CS held low for the whole window.
        let raw: RawU16 = color.into();
        let bytes = raw.into_inner().to_be_bytes();
        self.cs.set_low();
        self.dc.set_high();
        for _ in 0..width * height {
            self.spi.blocking_write(&bytes).ok();
        }
        self.cs.set_high();
    }

    /// Fill the whole panel.
    pub fn fill_screen(
        &mut self,
        color: Rgb565,
    ) {
        self.fill_rect(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, color);
    }
}

impl OriginDimensions for St7735<'_> {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for St7735<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            area.size.width,
            area.size.height,
            color,
        );
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill_screen(color);
        Ok(())
    }
}

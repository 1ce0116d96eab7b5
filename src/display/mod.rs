//! Display rendering for the 128×32 monochrome OLED.
//!
//! [`Frame`] is the framebuffer, stored in the controller's page layout so
//! a flush is a straight copy. Rendering goes through embedded-graphics:
//! icon blitting via `ImageRaw`, text via the built-in mono fonts. The
//! three screen layouts the firmware uses (splash, message, factor view)
//! are free functions over any `DrawTarget`, so they render identically
//! into the real panel and into test buffers.

pub mod icons;

use core::convert::Infallible;

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::sensor::Factor;

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 32;
const PAGES: usize = (HEIGHT as usize) / 8;

/// Where the value text starts, to the right of the icon.
const VIEW_TEXT_X: i32 = 48;
const VIEW_TEXT_Y: i32 = 8;

/// The icon bitmap for a factor; `None` for rows without a visual form.
pub fn icon_for(factor: Factor) -> Option<&'static [u8]> {
    match factor {
        Factor::Temperature => Some(&icons::TEMPERATURE),
        Factor::Humidity => Some(&icons::HUMIDITY),
        Factor::Uv => Some(&icons::UV),
        Factor::Light => Some(&icons::LUX),
        Factor::Pressure => Some(&icons::HPA),
        Factor::Altitude => Some(&icons::ELEVATION),
        Factor::AirQuality | Factor::Tvoc => Some(&icons::AQI),
        Factor::Co2 => Some(&icons::CO2),
        Factor::Motion => Some(&icons::MOTION),
        Factor::Noise => Some(&icons::NOISE),
        Factor::AirSensor => None,
    }
}

// ---------------------------------------------------------------------------
// Framebuffer
// ---------------------------------------------------------------------------

/// One page-organized framebuffer: byte `page * 128 + x` holds the eight
/// pixels at column `x`, rows `page*8 ..= page*8+7`, LSB topmost.
pub struct Frame {
    buffer: [u8; WIDTH as usize * PAGES],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self { buffer: [0; WIDTH as usize * PAGES] }
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// The raw page data, ready for the controller.
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let index = (y as usize / 8) * WIDTH as usize + x as usize;
        let bit = 1u8 << (y % 8);
        if on {
            self.buffer[index] |= bit;
        } else {
            self.buffer[index] &= !bit;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let index = (y as usize / 8) * WIDTH as usize + x as usize;
        self.buffer[index] & (1 << (y % 8)) != 0
    }

    /// Number of lit pixels; handy for tests.
    pub fn lit_pixels(&self) -> usize {
        self.buffer.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Screen layouts
// ---------------------------------------------------------------------------

/// The boot/rotation splash: the logo, centered vertically.
pub fn draw_splash<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let raw = ImageRaw::<BinaryColor>::new(&icons::SPLASH_LOGO, WIDTH);
    Image::new(&raw, Point::new(0, 1)).draw(target)
}

/// A short text message, top-left, newline-separated lines.
pub fn draw_text<D>(target: &mut D, message: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(message, Point::zero(), style, Baseline::Top).draw(target)?;
    Ok(())
}

/// One factor view: icon left, value and unit beside it.
pub fn draw_view<D>(target: &mut D, factor: Factor, value: &str, unit: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    if let Some(icon) = icon_for(factor) {
        let raw = ImageRaw::<BinaryColor>::new(icon, 32);
        Image::new(&raw, Point::zero()).draw(target)?;
    }
    let value_style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let text = Text::with_baseline(
        value,
        Point::new(VIEW_TEXT_X, VIEW_TEXT_Y),
        value_style,
        Baseline::Top,
    );
    let end = text.draw(target)?;
    if !unit.is_empty() {
        let unit_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        Text::with_baseline(unit, Point::new(end.x + 2, VIEW_TEXT_Y + 8), unit_style, Baseline::Top)
            .draw(target)?;
    }
    Ok(())
}

//! OLED display adapter.
//!
//! [`EspDisplay`] drives the SSD1306 controller over I²C: screens are
//! rendered into a [`Frame`](crate::display::Frame) through
//! embedded-graphics and flushed page by page. [`SimDisplay`] records the
//! screens it was asked for, which is what the tests assert on.

use crate::ports::DisplayPort;
use crate::sensor::Factor;

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::i2c::I2cDriver;
    use log::warn;

    use super::{DisplayPort, Factor};
    use crate::display::{self, Frame, HEIGHT, WIDTH};
    use crate::pins;

    const OLED_ADDR: u8 = 0x3C;
    const CONTROL_COMMAND: u8 = 0x00;
    const CONTROL_DATA: u8 = 0x40;

    // SSD1306 bring-up for a 128×32 panel, charge pump from 3.3 V.
    const INIT_SEQUENCE: &[u8] = &[
        0xAE, // display off
        0xD5, 0x80, // clock divide
        0xA8, 0x1F, // multiplex = 31
        0xD3, 0x00, // display offset
        0x40, // start line 0
        0x8D, 0x14, // charge pump on
        0x20, 0x00, // horizontal addressing
        0xA1, // segment remap
        0xC8, // COM scan direction
        0xDA, 0x02, // COM pins for 128×32
        0x81, 0x8F, // contrast
        0xD9, 0xF1, // precharge
        0xDB, 0x40, // VCOM detect
        0xA4, // resume from RAM
        0xA6, // normal (not inverted)
        0xAF, // display on
    ];

    /// DisplayPort over a shared I²C bus. The bus handle is borrowed per
    /// flush from the owner (main task only).
    pub struct EspDisplay {
        i2c: std::rc::Rc<std::cell::RefCell<I2cDriver<'static>>>,
        frame: Frame,
        ready: bool,
    }

    impl EspDisplay {
        pub fn new(i2c: std::rc::Rc<std::cell::RefCell<I2cDriver<'static>>>) -> Self {
            let mut display = Self { i2c, frame: Frame::new(), ready: false };
            display.init();
            display
        }

        /// (Re)initialise the controller; required after every peripheral
        /// power cycle.
        pub fn init(&mut self) {
            self.ready = true;
            for &command in INIT_SEQUENCE {
                if !self.command(command) {
                    warn!("display: init failed");
                    self.ready = false;
                    return;
                }
            }
            self.frame.clear();
            self.flush();
        }

        fn command(&mut self, command: u8) -> bool {
            self.i2c
                .borrow_mut()
                .write(OLED_ADDR, &[CONTROL_COMMAND, command], pins::I2C_TIMEOUT_TICKS)
                .is_ok()
        }

        fn flush(&mut self) {
            if !self.ready {
                return;
            }
            // Reset the addressing window, then stream all four pages.
            for command in [0x21, 0x00, (WIDTH - 1) as u8, 0x22, 0x00, (HEIGHT / 8 - 1) as u8] {
                if !self.command(command) {
                    self.ready = false;
                    return;
                }
            }
            let mut packet = Vec::with_capacity(self.frame.data().len() + 1);
            packet.push(CONTROL_DATA);
            packet.extend_from_slice(self.frame.data());
            if self
                .i2c
                .borrow_mut()
                .write(OLED_ADDR, &packet, pins::I2C_TIMEOUT_TICKS)
                .is_err()
            {
                warn!("display: flush failed");
                // Likely a peripheral power cycle; bring the controller
                // back up before the next screen.
                self.ready = false;
            }
        }

        /// A power cycle leaves the controller uninitialised and a flush
        /// failing; recover before drawing the next screen.
        fn ensure_ready(&mut self) {
            if !self.ready {
                self.init();
            }
        }
    }

    impl DisplayPort for EspDisplay {
        fn splash(&mut self) {
            self.ensure_ready();
            self.frame.clear();
            let _ = display::draw_splash(&mut self.frame);
            self.flush();
        }

        fn text(&mut self, message: &str) {
            self.ensure_ready();
            self.frame.clear();
            let _ = display::draw_text(&mut self.frame, message);
            self.flush();
        }

        fn view(&mut self, factor: Factor, value: &str, unit: &str) {
            self.ensure_ready();
            self.frame.clear();
            let _ = display::draw_view(&mut self.frame, factor, value, unit);
            self.flush();
        }

        fn clear(&mut self) {
            self.ensure_ready();
            self.frame.clear();
            self.flush();
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspDisplay;

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

/// One screen the display was asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Splash,
    Text(String),
    View { factor: Factor, value: String, unit: String },
    Clear,
}

/// Recording DisplayPort for host tests.
#[derive(Debug, Default)]
pub struct SimDisplay {
    pub rendered: Vec<Rendered>,
}

impl SimDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.rendered.iter().rev().find_map(|r| match r {
            Rendered::Text(t) => Some(t.as_str()),
            _ => None,
        })
    }
}

impl DisplayPort for SimDisplay {
    fn splash(&mut self) {
        self.rendered.push(Rendered::Splash);
    }

    fn text(&mut self, message: &str) {
        self.rendered.push(Rendered::Text(message.to_owned()));
    }

    fn view(&mut self, factor: Factor, value: &str, unit: &str) {
        self.rendered.push(Rendered::View {
            factor,
            value: value.to_owned(),
            unit: unit.to_owned(),
        });
    }

    fn clear(&mut self) {
        self.rendered.push(Rendered::Clear);
    }
}

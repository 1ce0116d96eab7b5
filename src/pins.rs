//! Pin and bus assignments for SnappySense HW 1.1.0 (Adafruit HUZZAH32).

/// Peripheral rail enable (A0). High = powered.
pub const POWER_ENABLE_GPIO: i32 = 26;

/// Wake/mode button (A1, BTN1). Interrupt on change.
pub const BUTTON_GPIO: i32 = 25;

/// Passive IR motion sensor (A2). Analog high while motion is seen.
pub const PIR_GPIO: i32 = 34;

/// MEMS microphone (A3). ADC1, quiescent ~1.5 V.
pub const MIC_GPIO: i32 = 39;

/// I²C master pins, shared by the OLED and both sensor chips.
pub const I2C_SDA_GPIO: i32 = 23;
pub const I2C_SCL_GPIO: i32 = 22;

/// I²C transaction timeout, in RTOS ticks.
pub const I2C_TIMEOUT_TICKS: u32 = 100;

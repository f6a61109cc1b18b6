//! Panel and touch-controller drivers plus the board wiring.
//!
//! Pin map on the STM32G0B1 carrier:
//!
//! | Signal        | Pin  | Peripheral |
//! |---------------|------|------------|
//! | display SCK   | PA5  | SPI1       |
//! | display MOSI  | PA7  | SPI1       |
//! | display CS    | PA4  | GPIO       |
//! | display DC    | PB0  | GPIO       |
//! | display RST   | PB1  | GPIO       |
//! | backlight     | PB2  | GPIO       |
//! | touch SCK     | PB13 | SPI2       |
//! | touch MISO    | PB14 | SPI2       |
//! | touch MOSI    | PB15 | SPI2       |
//! | touch CS      | PA8  | GPIO       |
//!
//! The drivers only see the [`display::DisplayBus`] and [`touch::TouchBus`]
//! traits, so they are exercised on the host with recording buses.

#[cfg_attr(not(target_os = "none"), allow(dead_code))]
pub mod display;
#[cfg_attr(not(target_os = "none"), allow(dead_code))]
pub mod touch;

#[cfg(target_os = "none")]
pub mod board;

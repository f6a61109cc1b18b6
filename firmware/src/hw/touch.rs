//! XPT2046 resistive touch controller.
//!
//! Each conversion is one control byte followed by a 16-bit reply holding the
//! 12-bit result left-aligned after a busy bit. Pressure is estimated from the
//! Z1/Z2 plates; readings below [`PRESSURE_THRESHOLD`] count as untouched.

use kiosk_core::touch::{RawSample, TouchSensor};

/// Control bytes with the pen IRQ left enabled between conversions.
pub mod cmd {
    pub const READ_X: u8 = 0xD0;
    pub const READ_Y: u8 = 0x90;
    pub const READ_Z1: u8 = 0xB0;
    pub const READ_Z2: u8 = 0xC0;
}

pub const PRESSURE_THRESHOLD: u16 = 400;
const ADC_MAX: u16 = 0x0FFF;

/// One SPI conversion: send `command`, return the raw 16-bit reply.
pub trait TouchBus {
    type Error;

    fn convert(&mut self, command: u8) -> Result<u16, Self::Error>;
}

/// Extracts the 12-bit sample from a conversion reply.
#[must_use]
pub const fn decode(reply: u16) -> u16 {
    (reply >> 3) & ADC_MAX
}

pub struct Xpt2046<B> {
    bus: B,
    threshold: u16,
}

impl<B> Xpt2046<B>
where
    B: TouchBus,
{
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            threshold: PRESSURE_THRESHOLD,
        }
    }

    /// Pressure estimate, zero when nothing touches the panel.
    pub fn pressure(&mut self) -> Result<u16, B::Error> {
        let z1 = self.read(cmd::READ_Z1)?;
        let z2 = self.read(cmd::READ_Z2)?;
        Ok(z1.saturating_add(ADC_MAX).saturating_sub(z2))
    }

    fn read(&mut self, command: u8) -> Result<u16, B::Error> {
        self.bus.convert(command).map(decode)
    }

    /// Median of three conversions to reject single-sample spikes.
    fn read_filtered(&mut self, command: u8) -> Result<u16, B::Error> {
        let mut samples = [
            self.read(command)?,
            self.read(command)?,
            self.read(command)?,
        ];
        samples.sort_unstable();
        Ok(samples[1])
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B> TouchSensor for Xpt2046<B>
where
    B: TouchBus,
{
    type Error = B::Error;

    fn is_touched(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressure()? >= self.threshold)
    }

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        let raw_x = self.read_filtered(cmd::READ_X)?;
        let raw_y = self.read_filtered(cmd::READ_Y)?;
        Ok(RawSample::new(raw_x, raw_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Replies with a fixed 12-bit value per channel; X readings cycle through a list.
    struct FakePanel {
        x: [u16; 3],
        x_reads: usize,
        y: u16,
        z1: u16,
        z2: u16,
        commands: heapless::Vec<u8, 16>,
    }

    impl FakePanel {
        fn pressed() -> Self {
            Self {
                x: [860, 4000, 862],
                x_reads: 0,
                y: 2075,
                z1: 600,
                z2: 3500,
                commands: heapless::Vec::new(),
            }
        }
    }

    impl TouchBus for FakePanel {
        type Error = Infallible;

        fn convert(&mut self, command: u8) -> Result<u16, Self::Error> {
            let _ = self.commands.push(command);
            let value = match command {
                cmd::READ_X => {
                    let value = self.x[self.x_reads % self.x.len()];
                    self.x_reads += 1;
                    value
                }
                cmd::READ_Y => self.y,
                cmd::READ_Z1 => self.z1,
                cmd::READ_Z2 => self.z2,
                _ => 0,
            };
            Ok(value << 3)
        }
    }

    #[test]
    fn decode_drops_busy_and_padding_bits() {
        assert_eq!(decode(0x7FF8), 0x0FFF);
        assert_eq!(decode(0x8007), 0);
        assert_eq!(decode(860 << 3), 860);
    }

    #[test]
    fn pressure_gates_touch_detection() {
        let mut panel = Xpt2046::new(FakePanel::pressed());
        assert_eq!(panel.pressure().unwrap(), 600 + 4095 - 3500);
        assert!(panel.is_touched().unwrap());

        panel.bus_mut().z1 = 0;
        panel.bus_mut().z2 = 4095;
        assert!(!panel.is_touched().unwrap());
    }

    #[test]
    fn raw_reading_uses_the_median_sample() {
        let mut panel = Xpt2046::new(FakePanel::pressed());
        let raw = panel.read_raw().unwrap();
        assert_eq!(raw, RawSample::new(862, 2075));
        assert_eq!(
            panel.bus_mut().commands.as_slice(),
            &[
                cmd::READ_X,
                cmd::READ_X,
                cmd::READ_X,
                cmd::READ_Y,
                cmd::READ_Y,
                cmd::READ_Y
            ]
        );
    }
}

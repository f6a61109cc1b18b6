//! Binds the drivers to the STM32 SPI peripherals and the embassy clock.

use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{self, Spi};
use embassy_time::{Instant, Timer};
use kiosk_core::{Clock, Millis};

use super::display::{self, DisplayBus, St7789};
use super::touch::TouchBus;

/// Pixels are packed into chunks of this many words per SPI write.
const PIXEL_CHUNK: usize = 32;

pub struct SpiTouchBus {
    spi: Spi<'static, Blocking>,
    cs: Output<'static>,
}

impl SpiTouchBus {
    pub fn new(spi: Spi<'static, Blocking>, cs: Output<'static>) -> Self {
        Self { spi, cs }
    }
}

impl TouchBus for SpiTouchBus {
    type Error = spi::Error;

    fn convert(&mut self, command: u8) -> Result<u16, Self::Error> {
        let mut frame = [command, 0, 0];
        self.cs.set_low();
        let result = self.spi.blocking_transfer_in_place(&mut frame);
        self.cs.set_high();
        result?;
        Ok(u16::from_be_bytes([frame[1], frame[2]]))
    }
}

pub struct SpiDisplayBus {
    spi: Spi<'static, Blocking>,
    cs: Output<'static>,
    dc: Output<'static>,
}

impl SpiDisplayBus {
    pub fn new(spi: Spi<'static, Blocking>, cs: Output<'static>, dc: Output<'static>) -> Self {
        Self { spi, cs, dc }
    }
}

impl DisplayBus for SpiDisplayBus {
    type Error = spi::Error;

    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.blocking_write(&[command]);
        if result.is_ok() && !data.is_empty() {
            self.dc.set_high();
            result = self.spi.blocking_write(data);
        }
        self.cs.set_high();
        result
    }

    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut chunk = [0u8; PIXEL_CHUNK * 2];
        let mut filled = 0;
        let mut result = Ok(());

        self.cs.set_low();
        self.dc.set_high();
        for pixel in pixels {
            let [high, low] = pixel.to_be_bytes();
            chunk[filled] = high;
            chunk[filled + 1] = low;
            filled += 2;
            if filled == chunk.len() {
                result = self.spi.blocking_write(&chunk);
                filled = 0;
                if result.is_err() {
                    break;
                }
            }
        }
        if result.is_ok() && filled > 0 {
            result = self.spi.blocking_write(&chunk[..filled]);
        }
        self.cs.set_high();
        result
    }
}

/// Pulses the reset line and sends the panel bring-up sequence.
///
/// # Errors
///
/// Returns the first SPI failure.
pub async fn init_display(
    panel: &mut St7789<SpiDisplayBus>,
    reset: &mut Output<'static>,
) -> Result<(), spi::Error> {
    reset.set_low();
    Timer::after_millis(10).await;
    reset.set_high();
    Timer::after_millis(120).await;

    for step in display::INIT_SEQUENCE {
        panel.bus_mut().command(step.command, step.data)?;
        if step.delay_ms > 0 {
            Timer::after_millis(step.delay_ms).await;
        }
    }
    Ok(())
}

/// Kiosk clock backed by the embassy time driver.
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Millis {
        // The kiosk counter wraps after ~49 days; elapsed maths are wrap-safe.
        #[allow(clippy::cast_possible_truncation)]
        Millis::new(Instant::now().as_millis() as u32)
    }
}

use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::mhz;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use static_cell::StaticCell;

use crate::hw::board::{SpiDisplayBus, SpiTouchBus};
use crate::usb;

mod kiosk_task;
mod usb_task;

/// One USB packet worth of console bytes.
pub(super) type ConsoleFrame = heapless::Vec<u8, { usb::MAX_PACKET_SIZE as usize }>;

const CONSOLE_RX_DEPTH: usize = 4;
/// Deep enough for the longest reply.
const CONSOLE_TX_DEPTH: usize = 24;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

pub(super) static CONSOLE_RX: Channel<CriticalSectionRawMutex, ConsoleFrame, CONSOLE_RX_DEPTH> =
    Channel::new();
pub(super) static CONSOLE_TX: Channel<CriticalSectionRawMutex, ConsoleFrame, CONSOLE_TX_DEPTH> =
    Channel::new();
pub(super) static USB_STORAGE: StaticCell<usb::UsbDeviceStorage> = StaticCell::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let hal::Peripherals {
        PA4,
        PA5,
        PA7,
        PA8,
        PA11,
        PA12,
        PB0,
        PB1,
        PB2,
        PB13,
        PB14,
        PB15,
        SPI1,
        SPI2,
        USB,
        ..
    } = hal::init(hal::Config::default());

    let mut display_config = spi::Config::default();
    display_config.frequency = mhz(32);
    display_config.mode = spi::MODE_3;
    let display_bus = SpiDisplayBus::new(
        Spi::new_blocking_txonly(SPI1, PA5, PA7, display_config),
        Output::new(PA4, Level::High, Speed::VeryHigh),
        Output::new(PB0, Level::Low, Speed::VeryHigh),
    );
    let reset = Output::new(PB1, Level::High, Speed::Low);
    let backlight = Output::new(PB2, Level::Low, Speed::Low);

    let mut touch_config = spi::Config::default();
    touch_config.frequency = mhz(2);
    let touch_bus = SpiTouchBus::new(
        Spi::new_blocking(SPI2, PB13, PB15, PB14, touch_config),
        Output::new(PA8, Level::High, Speed::Low),
    );

    spawner
        .spawn(usb_task::run(USB, PA12, PA11))
        .expect("failed to spawn USB task");

    spawner
        .spawn(kiosk_task::run(display_bus, reset, backlight, touch_bus))
        .expect("failed to spawn kiosk task");

    core::future::pending::<()>().await;
}

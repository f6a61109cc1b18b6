use embassy_futures::join::join;
use embassy_futures::select::{Either3, select3};
use embassy_stm32 as hal;
use embassy_stm32::Peri;
use embassy_usb::driver::EndpointError;

use super::{CONSOLE_RX, CONSOLE_TX, ConsoleFrame, USB_STORAGE};
use crate::status;
use crate::usb::{self, UsbDeviceStrings};

embassy_stm32::bind_interrupts!(struct UsbIrqs {
    USB_UCPD1_2 => embassy_stm32::usb::InterruptHandler<hal::peripherals::USB>;
});

#[embassy_executor::task]
pub async fn run(
    usb: Peri<'static, hal::peripherals::USB>,
    dp: Peri<'static, hal::peripherals::PA12>,
    dm: Peri<'static, hal::peripherals::PA11>,
) -> ! {
    let storage = USB_STORAGE.init(usb::UsbDeviceStorage::new());
    let driver = embassy_stm32::usb::Driver::new(usb, UsbIrqs, dp, dm);

    let (mut device, port) = usb::build(driver, storage, UsbDeviceStrings::default());

    join(device.run(), run_console_interface(port)).await;
    loop {
        core::future::pending::<()>().await;
    }
}

async fn run_console_interface<D>(port: usb::ConsolePort<D>) -> !
where
    D: embassy_usb::driver::Driver<'static>,
{
    let usb::ConsolePort {
        mut sender,
        mut receiver,
        control,
    } = port;
    let rx_queue = CONSOLE_RX.sender();
    let tx_queue = CONSOLE_TX.receiver();
    let mut ingress = [0u8; usb::MAX_PACKET_SIZE as usize];
    let mut pending_tx: Option<ConsoleFrame> = None;

    loop {
        join(receiver.wait_connection(), sender.wait_connection()).await;
        wait_for_dtr(&control, &mut sender).await;
        pending_tx = None;
        CONSOLE_TX.clear();
        status::set_console_attached(true);

        defmt::info!("usb: console connected");

        loop {
            match select3(
                receiver.read_packet(&mut ingress),
                async {
                    let frame = match pending_tx.take() {
                        Some(frame) => frame,
                        None => tx_queue.receive().await,
                    };
                    let result = sender.write_packet(&frame).await;
                    if result.is_err() {
                        pending_tx = Some(frame);
                    }
                    result
                },
                control.control_changed(),
            )
            .await
            {
                Either3::First(Ok(0)) => {}
                Either3::First(Ok(count)) => {
                    let Ok(frame) = ConsoleFrame::from_slice(&ingress[..count]) else {
                        let dropped = status::record_dropped_frame();
                        defmt::warn!("usb: dropping console frame len={} total={}", count, dropped);
                        continue;
                    };
                    rx_queue.send(frame).await;
                }
                Either3::First(Err(EndpointError::Disabled)) => {
                    defmt::warn!("usb: console interface disabled");
                    break;
                }
                Either3::First(Err(_)) => {
                    defmt::warn!("usb: console read error");
                }
                Either3::Second(Ok(())) => {}
                Either3::Second(Err(EndpointError::Disabled)) => {
                    defmt::warn!("usb: console write disabled");
                    break;
                }
                Either3::Second(Err(_)) => {
                    defmt::warn!("usb: console write error");
                }
                Either3::Third(()) => {
                    if !sender.dtr() {
                        defmt::warn!("usb: console host dropped DTR");
                        break;
                    }
                }
            }
        }

        status::set_console_attached(false);
    }
}

async fn wait_for_dtr<D>(
    control: &embassy_usb::class::cdc_acm::ControlChanged<'static>,
    sender: &mut embassy_usb::class::cdc_acm::Sender<'static, D>,
) where
    D: embassy_usb::driver::Driver<'static>,
{
    while !sender.dtr() {
        control.control_changed().await;
    }
}

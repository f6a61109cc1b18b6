use embassy_stm32::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Ticker};
use kiosk_core::render::graphics::DrawTargetRenderer;
use kiosk_core::{Clock, Kiosk, KioskConfig};

use super::{CONSOLE_RX, CONSOLE_TX, ConsoleFrame};
use crate::console::{self, LineAssembler, LineError};
use crate::hw::board::{self, EmbassyClock, SpiDisplayBus, SpiTouchBus};
use crate::hw::display::St7789;
use crate::hw::touch::Xpt2046;
use crate::status;
use crate::telemetry::EventMirror;

type ConsoleSender = Sender<'static, CriticalSectionRawMutex, ConsoleFrame, { super::CONSOLE_TX_DEPTH }>;

#[embassy_executor::task]
pub async fn run(
    display_bus: SpiDisplayBus,
    mut reset: Output<'static>,
    mut backlight: Output<'static>,
    touch_bus: SpiTouchBus,
) -> ! {
    let clock = EmbassyClock;
    let config = KioskConfig::default();
    let samples = config.stabilizer.confirm_threshold;

    let mut panel = St7789::new(display_bus);
    if let Err(err) = board::init_display(&mut panel, &mut reset).await {
        defmt::warn!("display: init failed: {}", defmt::Debug2Format(&err));
    }
    backlight.set_high();

    let mut kiosk = Kiosk::new(
        Xpt2046::new(touch_bus),
        DrawTargetRenderer::new(panel),
        &config,
        clock.now(),
    );
    if let Err(err) = kiosk.start(clock.now()) {
        defmt::warn!("kiosk: {}", defmt::Display2Format(&err));
    }

    let mut mirror = EventMirror::new();
    let mut assembler = LineAssembler::new();
    let rx = CONSOLE_RX.receiver();
    let tx = CONSOLE_TX.sender();
    let period = Duration::try_from(config.poll_interval).unwrap_or(Duration::from_millis(5));
    let mut ticker = Ticker::every(period);

    defmt::info!("kiosk: running, poll every {} ms", period.as_millis());

    loop {
        ticker.next().await;

        if let Err(err) = kiosk.poll(clock.now()) {
            defmt::warn!("kiosk: {}", defmt::Display2Format(&err));
        }

        match (status::console_attached(), assembler.is_connected()) {
            (true, false) => assembler.on_connect(),
            (false, true) => assembler.on_disconnect(),
            _ => {}
        }

        while let Ok(frame) = rx.try_receive() {
            for &byte in &frame {
                let result = assembler.ingest(byte, |line| {
                    let reply = console::respond(&mut kiosk, &clock, line, samples);
                    send_reply(&tx, reply.as_bytes());
                });
                match result {
                    Ok(()) => {}
                    Err(LineError::Overflow) => send_reply(&tx, b"ERR line too long\n"),
                    Err(LineError::InvalidUtf8) => send_reply(&tx, b"ERR line is not UTF-8\n"),
                }
            }
        }

        mirror.flush(kiosk.history());
    }
}

fn send_reply(tx: &ConsoleSender, reply: &[u8]) {
    for chunk in reply.chunks(usize::from(crate::usb::MAX_PACKET_SIZE)) {
        let Ok(frame) = ConsoleFrame::from_slice(chunk) else {
            continue;
        };
        if tx.try_send(frame).is_err() {
            let dropped = status::record_dropped_frame();
            defmt::warn!("console: reply truncated, dropped frames={}", dropped);
            return;
        }
    }
}

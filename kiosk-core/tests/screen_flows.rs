use kiosk_core::console::BenchSensor;
use kiosk_core::render::NullRenderer;
use kiosk_core::screen::layout::{self, KEYPAD};
use kiosk_core::screen::{Control, ScreenState};
use kiosk_core::telemetry::{KioskEvent, ServeReason};
use kiosk_core::touch::ScreenPoint;
use kiosk_core::{Kiosk, KioskConfig, Millis, Ticket};

type TestKiosk = Kiosk<BenchSensor, NullRenderer>;

fn kiosk(config: &KioskConfig) -> TestKiosk {
    let mut kiosk = Kiosk::new(
        BenchSensor::default(),
        NullRenderer::default(),
        config,
        Millis::ZERO,
    );
    kiosk.start(Millis::ZERO).expect("start");
    kiosk
}

fn control(state: ScreenState, control: Control) -> ScreenPoint {
    layout::region_of(state, control)
        .expect("control is on screen")
        .rect
        .center()
}

fn press(kiosk: &mut TestKiosk, target: Control, now: u32) {
    let point = control(kiosk.state(), target);
    kiosk
        .inject_touch(point, Millis::new(now))
        .expect("touch handled");
}

fn type_pin(kiosk: &mut TestKiosk, pin: &str, now: u32) {
    for c in pin.chars() {
        let digit = c.to_digit(16).expect("hex pin");
        let key = KEYPAD[usize::try_from(digit).expect("digit")].rect.center();
        kiosk.inject_touch(key, Millis::new(now)).expect("key");
    }
    press(kiosk, Control::Enter, now);
}

fn join(kiosk: &mut TestKiosk, now: u32) {
    press(kiosk, Control::JoinQueue, now);
    if kiosk.state() == ScreenState::TicketIssued {
        press(kiosk, Control::Confirm, now);
    }
}

fn events(kiosk: &TestKiosk) -> Vec<KioskEvent> {
    kiosk.history().oldest_first().map(|record| record.event).collect()
}

#[test]
fn twenty_first_customer_sees_queue_full_until_timeout() {
    let mut kiosk = kiosk(&KioskConfig::default());
    for _ in 0..20 {
        join(&mut kiosk, 0);
    }
    assert_eq!(kiosk.context().queue.len(), 20);

    press(&mut kiosk, Control::JoinQueue, 1_000);
    assert_eq!(kiosk.state(), ScreenState::QueueFull);
    assert_eq!(kiosk.context().queue.len(), 20);
    assert_eq!(kiosk.context().dispenser.peek(), Ticket::new(21));
    assert!(events(&kiosk).contains(&KioskEvent::QueueFull { capacity: 20 }));

    kiosk.tick(Millis::new(10_999)).expect("tick");
    assert_eq!(kiosk.state(), ScreenState::QueueFull);
    kiosk.tick(Millis::new(11_000)).expect("tick");
    assert_eq!(kiosk.state(), ScreenState::UserMain);
}

#[test]
fn ticket_screen_reverts_on_its_own() {
    let mut kiosk = kiosk(&KioskConfig::default());
    press(&mut kiosk, Control::JoinQueue, 2_000);
    assert_eq!(kiosk.state(), ScreenState::TicketIssued);

    let issued = kiosk.context().issued.expect("issued ticket");
    assert_eq!(issued.ticket, Ticket::new(1));
    assert_eq!(issued.position, 1);
    assert_eq!(issued.wait.as_secs(), 60);

    kiosk.tick(Millis::new(12_000)).expect("tick");
    assert_eq!(kiosk.state(), ScreenState::UserMain);
}

#[test]
fn keypad_login_accepts_the_default_password() {
    let mut kiosk = kiosk(&KioskConfig::default());
    press(&mut kiosk, Control::AdminIcon, 100);
    assert_eq!(kiosk.state(), ScreenState::AdminLogin);

    type_pin(&mut kiosk, "1234", 200);
    assert_eq!(kiosk.state(), ScreenState::AdminMain);
    assert!(events(&kiosk).contains(&KioskEvent::LoginAccepted));
}

#[test]
fn wrong_password_clears_the_entry_and_stays_put() {
    let mut kiosk = kiosk(&KioskConfig::default());
    press(&mut kiosk, Control::AdminIcon, 100);

    type_pin(&mut kiosk, "1235", 200);
    assert_eq!(kiosk.state(), ScreenState::AdminLogin);
    assert!(kiosk.context().admin.entered.is_empty());
    assert!(events(&kiosk).contains(&KioskEvent::LoginRejected));

    type_pin(&mut kiosk, "1234", 300);
    assert_eq!(kiosk.state(), ScreenState::AdminMain);
}

#[test]
fn changed_password_replaces_the_old_one() {
    let mut kiosk = kiosk(&KioskConfig::default());
    press(&mut kiosk, Control::AdminIcon, 0);
    type_pin(&mut kiosk, "1234", 0);
    press(&mut kiosk, Control::ChangePassword, 0);
    assert_eq!(kiosk.state(), ScreenState::PasswordChange);

    type_pin(&mut kiosk, "BEEF", 0);
    assert_eq!(kiosk.state(), ScreenState::AdminMain);
    assert!(events(&kiosk).contains(&KioskEvent::PasswordChanged));

    press(&mut kiosk, Control::Back, 0);
    press(&mut kiosk, Control::AdminIcon, 0);
    type_pin(&mut kiosk, "1234", 0);
    assert_eq!(kiosk.state(), ScreenState::AdminLogin);
    type_pin(&mut kiosk, "BEEF", 0);
    assert_eq!(kiosk.state(), ScreenState::AdminMain);
}

#[test]
fn front_ticket_is_served_each_period() {
    let mut kiosk = kiosk(&KioskConfig::default().with_per_ticket_seconds(5));
    for _ in 0..3 {
        join(&mut kiosk, 0);
    }

    kiosk.tick(Millis::new(4_999)).expect("tick");
    assert_eq!(kiosk.context().queue.len(), 3);

    kiosk.tick(Millis::new(5_000)).expect("tick");
    assert_eq!(kiosk.context().queue.as_slice(), &[Ticket::new(2), Ticket::new(3)]);

    kiosk.tick(Millis::new(10_000)).expect("tick");
    kiosk.tick(Millis::new(15_000)).expect("tick");
    assert!(kiosk.context().queue.is_empty());

    let served: Vec<_> = events(&kiosk)
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                KioskEvent::TicketServed {
                    reason: ServeReason::Timer,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(served.len(), 3);
}

#[test]
fn wait_estimate_counts_down_the_current_ticket() {
    let mut kiosk = kiosk(&KioskConfig::default());
    for _ in 0..3 {
        join(&mut kiosk, 0);
    }
    // 50 s left on the first ticket plus two full periods.
    assert_eq!(kiosk.context().current_wait(Millis::new(10_000)).as_secs(), 170);
}

#[test]
fn admin_removes_a_ticket_from_the_middle() {
    let mut kiosk = kiosk(&KioskConfig::default());
    for _ in 0..3 {
        join(&mut kiosk, 0);
    }
    press(&mut kiosk, Control::AdminIcon, 0);
    type_pin(&mut kiosk, "1234", 0);
    press(&mut kiosk, Control::ViewQueue, 0);
    assert_eq!(kiosk.state(), ScreenState::QueueList);

    let slot = layout::queue_slot(1).expect("slot").center();
    kiosk.inject_touch(slot, Millis::new(0)).expect("slot");
    assert_eq!(kiosk.state(), ScreenState::QueueDeleteConfirm);
    press(&mut kiosk, Control::Yes, 0);

    assert_eq!(kiosk.state(), ScreenState::QueueList);
    assert_eq!(kiosk.context().queue.as_slice(), &[Ticket::new(1), Ticket::new(3)]);
    assert!(events(&kiosk).contains(&KioskEvent::TicketServed {
        ticket: Ticket::new(2),
        reason: ServeReason::Admin,
    }));
}

#[test]
fn service_time_stops_at_its_bounds() {
    let mut kiosk = kiosk(&KioskConfig::default().with_per_ticket_seconds(98));
    press(&mut kiosk, Control::AdminIcon, 0);
    type_pin(&mut kiosk, "1234", 0);
    press(&mut kiosk, Control::TimeSetting, 0);

    press(&mut kiosk, Control::Increment, 0);
    press(&mut kiosk, Control::Increment, 0);
    assert_eq!(kiosk.context().timing.per_ticket_seconds(), 99);

    press(&mut kiosk, Control::Confirm, 0);
    assert_eq!(kiosk.state(), ScreenState::AdminMain);
}

use core::convert::Infallible;

use kiosk_core::config::KioskConfig;
use kiosk_core::kiosk::Kiosk;
use kiosk_core::render::NullRenderer;
use kiosk_core::screen::ScreenState;
use kiosk_core::screen::layout::{ADMIN_ICON, JOIN_BUTTON};
use kiosk_core::touch::calibration::{self, AxisCalibration, CalibrationProfile};
use kiosk_core::touch::{RawSample, ScreenPoint, ScreenSize, StabilizerState, TouchSensor};
use kiosk_core::Millis;

/// Panel that replays a script of per-cycle readings, then reports no touch.
struct ScriptedPanel {
    script: Vec<Option<RawSample>>,
    cursor: usize,
    current: Option<RawSample>,
}

impl ScriptedPanel {
    fn new(script: Vec<Option<RawSample>>) -> Self {
        Self {
            script,
            cursor: 0,
            current: None,
        }
    }
}

impl TouchSensor for ScriptedPanel {
    type Error = Infallible;

    fn is_touched(&mut self) -> Result<bool, Self::Error> {
        self.current = self.script.get(self.cursor).copied().flatten();
        self.cursor += 1;
        Ok(self.current.is_some())
    }

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        Ok(self.current.unwrap_or_default())
    }
}

/// Raw reading that lands on `point` under the default calibration.
fn raw_for(point: ScreenPoint) -> RawSample {
    let profile = CalibrationProfile::default();
    let size = ScreenSize::PORTRAIT;
    (0..=4095u16)
        .step_by(3)
        .flat_map(|raw_x| (0..=4095u16).step_by(3).map(move |raw_y| RawSample::new(raw_x, raw_y)))
        .find(|raw| profile.map(*raw, size).is_within(point, 2))
        .expect("calibration covers the whole screen")
}

fn run(script: Vec<Option<RawSample>>) -> (Kiosk<ScriptedPanel, NullRenderer>, Vec<ScreenPoint>) {
    let cycles = script.len();
    let mut kiosk = Kiosk::new(
        ScriptedPanel::new(script),
        NullRenderer::default(),
        &KioskConfig::default(),
        Millis::ZERO,
    );
    kiosk.start(Millis::ZERO).expect("infallible");

    let mut confirmed = Vec::new();
    for cycle in 0..cycles {
        let now = Millis::new(u32::try_from(cycle).expect("short script"));
        if let Some(point) = kiosk.poll(now).expect("infallible") {
            confirmed.push(point);
        }
    }
    (kiosk, confirmed)
}

#[test]
fn mapper_output_is_always_on_screen() {
    let profile = CalibrationProfile::default();
    for raw_x in (0..=u16::MAX).step_by(257) {
        for raw_y in (0..=u16::MAX).step_by(263) {
            let point = calibration::map(RawSample::new(raw_x, raw_y), &profile, 240, 320);
            assert!(point.x <= 239 && point.y <= 319, "{raw_x},{raw_y} -> {point}");
        }
    }
}

#[test]
fn mapper_swaps_axes_for_the_rotated_panel() {
    let profile = CalibrationProfile::default();
    // Raw Y alone moves screen X.
    let left = calibration::map(RawSample::new(2000, 500), &profile, 240, 320);
    let right = calibration::map(RawSample::new(2000, 3600), &profile, 240, 320);
    assert_eq!(left.y, right.y);
    assert!(left.x < right.x);

    // Raw X runs bottom-to-top.
    let high = calibration::map(RawSample::new(3700, 2000), &profile, 240, 320);
    let low = calibration::map(RawSample::new(300, 2000), &profile, 240, 320);
    assert_eq!(high.x, low.x);
    assert!(high.y < low.y);
}

#[test]
fn degenerate_calibration_never_fails() {
    let flat = AxisCalibration::forward(2048, 2048);
    let profile = CalibrationProfile::new(flat, flat, false);
    let point = calibration::map(RawSample::new(17, 4000), &profile, 240, 320);
    assert_eq!(point, ScreenPoint::new(0, 0));
}

#[test]
fn forty_nine_stable_samples_change_nothing() {
    let raw = raw_for(JOIN_BUTTON.center());
    let (kiosk, confirmed) = run(vec![Some(raw); 49]);
    assert!(confirmed.is_empty());
    assert_eq!(kiosk.state(), ScreenState::UserMain);
    assert!(kiosk.context().queue.is_empty());
}

#[test]
fn fiftieth_stable_sample_presses_the_button() {
    let raw = raw_for(JOIN_BUTTON.center());
    let (kiosk, confirmed) = run(vec![Some(raw); 50]);
    assert_eq!(confirmed.len(), 1);
    assert!(JOIN_BUTTON.contains(confirmed[0]));
    assert_eq!(kiosk.state(), ScreenState::TicketIssued);
    assert!(matches!(
        kiosk.stabilizer().state(),
        StabilizerState::Settling { .. }
    ));
}

#[test]
fn lifting_midway_restarts_the_count() {
    let raw = raw_for(ADMIN_ICON.center());
    let mut script = vec![Some(raw); 30];
    script.push(None);
    script.extend(vec![Some(raw); 30]);
    let (kiosk, confirmed) = run(script);
    assert!(confirmed.is_empty());
    assert_eq!(kiosk.state(), ScreenState::UserMain);
    assert_eq!(kiosk.stabilizer().count(), 30);
}

#[test]
fn held_finger_confirms_again_only_after_settling() {
    let raw = raw_for(ADMIN_ICON.center());
    // One cycle per millisecond: confirm at 49, settle until 149, confirm at 198.
    let (_, confirmed) = run(vec![Some(raw); 199]);
    assert_eq!(confirmed.len(), 2);
}

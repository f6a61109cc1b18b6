//! The poll-driven kiosk runtime.
//!
//! One call to [`Kiosk::poll`] is one cycle of the main loop: sample the
//! panel, map and stabilize the reading, feed a confirmed touch to the screen
//! machine, run the tick rules, then carry out the drawing and history effects.

use core::fmt;
use core::time::Duration;

use crate::clock::Millis;
use crate::config::KioskConfig;
use crate::render::{self, Renderer};
use crate::screen::{self, Effect, Input, KioskContext, Region, ScreenState, Step};
use crate::telemetry::{EventRecorder, KioskEvent};
use crate::touch::{CalibrationProfile, ScreenPoint, ScreenSize, TouchSensor, TouchStabilizer};

/// Failure from one of the runtime's collaborators.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KioskError<S, R> {
    Sensor(S),
    Render(R),
}

impl<S: fmt::Debug, R: fmt::Debug> fmt::Display for KioskError<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KioskError::Sensor(err) => write!(f, "touch sensor error: {err:?}"),
            KioskError::Render(err) => write!(f, "display error: {err:?}"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PendingFlash {
    region: Region,
    screen: ScreenState,
    started: Millis,
}

pub struct Kiosk<S, R> {
    sensor: S,
    renderer: R,
    screen_size: ScreenSize,
    calibration: CalibrationProfile,
    stabilizer: TouchStabilizer,
    state: ScreenState,
    context: KioskContext,
    history: EventRecorder,
    flash: Option<PendingFlash>,
    flash_period: Duration,
}

impl<S, R> Kiosk<S, R>
where
    S: TouchSensor,
    R: Renderer,
{
    pub fn new(sensor: S, renderer: R, config: &KioskConfig, now: Millis) -> Self {
        Self {
            sensor,
            renderer,
            screen_size: config.screen,
            calibration: config.calibration,
            stabilizer: TouchStabilizer::new(config.stabilizer),
            state: ScreenState::UserMain,
            context: KioskContext::new(config, now),
            history: EventRecorder::new(),
            flash: None,
            flash_period: config.flash,
        }
    }

    /// Paints the initial screen and records the start event.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::Render`] when the first paint fails.
    pub fn start(&mut self, now: Millis) -> Result<(), KioskError<S::Error, R::Error>> {
        self.history.record(KioskEvent::Started, now);
        render::paint(&mut self.renderer, self.state, &self.context, now)
            .map_err(KioskError::Render)
    }

    /// Runs one cycle of the main loop.
    ///
    /// Returns the touch confirmed during this cycle, if any. A sensor failure
    /// counts as an untouched cycle so the time rules keep running.
    ///
    /// # Errors
    ///
    /// Reports the sensor or renderer failure after the cycle completes.
    pub fn poll(
        &mut self,
        now: Millis,
    ) -> Result<Option<ScreenPoint>, KioskError<S::Error, R::Error>> {
        let (sample, sensor_error) = match self.sample() {
            Ok(sample) => (sample, None),
            Err(err) => (None, Some(err)),
        };

        let confirmed = self.stabilizer.sample(now, sample);
        let drawn = self.cycle(confirmed, now);

        if let Some(err) = sensor_error {
            return Err(KioskError::Sensor(err));
        }
        drawn.map_err(KioskError::Render)?;
        Ok(confirmed)
    }

    /// Delivers a confirmed touch directly, bypassing sensor and stabilizer.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::Render`] when drawing the result fails.
    pub fn inject_touch(
        &mut self,
        point: ScreenPoint,
        now: Millis,
    ) -> Result<(), KioskError<S::Error, R::Error>> {
        self.cycle(Some(point), now).map_err(KioskError::Render)
    }

    /// Runs only the tick rules and flash expiry, without sampling the panel.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::Render`] when drawing fails.
    pub fn tick(&mut self, now: Millis) -> Result<(), KioskError<S::Error, R::Error>> {
        self.cycle(None, now).map_err(KioskError::Render)
    }

    fn sample(&mut self) -> Result<Option<ScreenPoint>, S::Error> {
        if !self.sensor.is_touched()? {
            return Ok(None);
        }
        let raw = self.sensor.read_raw()?;
        Ok(Some(self.calibration.map(raw, self.screen_size)))
    }

    fn cycle(&mut self, confirmed: Option<ScreenPoint>, now: Millis) -> Result<(), R::Error> {
        if let Some(point) = confirmed {
            self.history.record(KioskEvent::TouchConfirmed(point), now);
            self.dispatch(Input::Touch(point), now)?;
        }
        self.dispatch(Input::Tick, now)?;
        self.expire_flash(now)
    }

    fn dispatch(&mut self, input: Input, now: Millis) -> Result<(), R::Error> {
        let step = screen::step(self.state, &mut self.context, input, now);
        self.apply(&step, now)
    }

    fn apply(&mut self, step: &Step, now: Millis) -> Result<(), R::Error> {
        let previous = self.state;
        self.state = step.next;
        if previous != step.next {
            self.history.record(
                KioskEvent::ScreenChanged {
                    from: previous,
                    to: step.next,
                },
                now,
            );
        }
        for event in step.events() {
            self.history.record(event, now);
        }

        if step.repaints() {
            self.flash = None;
            return render::paint(&mut self.renderer, self.state, &self.context, now);
        }

        for effect in &step.effects {
            match effect {
                Effect::RefreshWaitTime => {
                    render::paint_wait_time(&mut self.renderer, &self.context, now)?;
                }
                Effect::RefreshPinEntry => {
                    render::paint_pin_entry(&mut self.renderer, self.state, &self.context)?;
                }
                Effect::RefreshServiceTime => {
                    render::paint_service_time(&mut self.renderer, &self.context)?;
                }
                Effect::Flash(region) => {
                    self.restore_flash()?;
                    render::paint_flash(&mut self.renderer, *region)?;
                    self.flash = Some(PendingFlash {
                        region: *region,
                        screen: self.state,
                        started: now,
                    });
                }
                Effect::Repaint | Effect::Record(_) => {}
            }
        }
        Ok(())
    }

    fn expire_flash(&mut self, now: Millis) -> Result<(), R::Error> {
        match self.flash {
            Some(pending) if now.has_elapsed(pending.started, self.flash_period) => {
                self.restore_flash()
            }
            _ => Ok(()),
        }
    }

    fn restore_flash(&mut self) -> Result<(), R::Error> {
        match self.flash.take() {
            Some(pending) if pending.screen == self.state => {
                render::paint_button(&mut self.renderer, pending.region)
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub const fn state(&self) -> ScreenState {
        self.state
    }

    #[must_use]
    pub const fn context(&self) -> &KioskContext {
        &self.context
    }

    #[must_use]
    pub const fn history(&self) -> &EventRecorder {
        &self.history
    }

    #[must_use]
    pub const fn stabilizer(&self) -> &TouchStabilizer {
        &self.stabilizer
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Returns `true` while a pressed button is still highlighted.
    #[must_use]
    pub const fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }
}

//! Simulated panel and clock for driving a kiosk from the console.

use core::convert::Infallible;
use core::time::Duration;

use crate::clock::{Clock, Millis};
use crate::config::KioskConfig;
use crate::kiosk::{Kiosk, KioskError};
use crate::queue::Ticket;
use crate::render::Renderer;
use crate::screen::ScreenState;
use crate::telemetry::EventRecorder;
use crate::touch::{RawSample, ScreenPoint, TouchSensor};

use super::commands::{ConsoleTarget, TargetError};
use super::status::StatusSnapshot;

/// Touch sensor whose pen state is set by the bench.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BenchSensor {
    held: Option<RawSample>,
}

impl BenchSensor {
    pub fn hold(&mut self, raw: RawSample) {
        self.held = Some(raw);
    }

    pub fn lift(&mut self) {
        self.held = None;
    }
}

impl TouchSensor for BenchSensor {
    type Error = Infallible;

    fn is_touched(&mut self) -> Result<bool, Self::Error> {
        Ok(self.held.is_some())
    }

    fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        Ok(self.held.unwrap_or_default())
    }
}

/// Manually advanced clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BenchClock {
    now: Millis,
}

impl BenchClock {
    #[must_use]
    pub const fn starting_at(now: Millis) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now = self.now + by;
    }
}

impl Clock for BenchClock {
    fn now(&self) -> Millis {
        self.now
    }
}

/// A kiosk wired to a [`BenchSensor`] and [`BenchClock`].
pub struct Bench<R> {
    kiosk: Kiosk<BenchSensor, R>,
    clock: BenchClock,
    poll_interval: Duration,
}

impl<R> Bench<R>
where
    R: Renderer,
{
    /// Builds the kiosk at time zero and paints the first screen.
    ///
    /// # Errors
    ///
    /// Returns the renderer error if the first paint fails.
    pub fn new(renderer: R, config: &KioskConfig) -> Result<Self, R::Error> {
        let clock = BenchClock::starting_at(Millis::ZERO);
        let mut kiosk = Kiosk::new(BenchSensor::default(), renderer, config, clock.now());
        kiosk.start(clock.now()).map_err(render_error)?;
        Ok(Self {
            kiosk,
            clock,
            poll_interval: config.poll_interval,
        })
    }

    #[must_use]
    pub const fn kiosk(&self) -> &Kiosk<BenchSensor, R> {
        &self.kiosk
    }

    pub fn kiosk_mut(&mut self) -> &mut Kiosk<BenchSensor, R> {
        &mut self.kiosk
    }

    fn step_clock(&mut self, by: Duration) -> Result<Option<ScreenPoint>, TargetError> {
        self.clock.advance(by);
        self.kiosk
            .poll(self.clock.now())
            .map_err(|_| TargetError::Device)
    }
}

fn render_error<E>(error: KioskError<Infallible, E>) -> E {
    match error {
        KioskError::Render(err) => err,
        KioskError::Sensor(never) => match never {},
    }
}

impl<R> ConsoleTarget for Bench<R>
where
    R: Renderer,
{
    fn now(&self) -> Millis {
        self.clock.now()
    }

    fn tap(&mut self, point: ScreenPoint) -> Result<(), TargetError> {
        self.kiosk
            .inject_touch(point, self.clock.now())
            .map_err(|_| TargetError::Device)
    }

    fn press(&mut self, raw: RawSample, samples: u16) -> Result<Option<ScreenPoint>, TargetError> {
        self.kiosk.sensor_mut().hold(raw);
        let mut first = None;
        let mut outcome = Ok(());
        for _ in 0..samples {
            match self.step_clock(self.poll_interval) {
                Ok(confirmed) => first = first.or(confirmed),
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }
        self.kiosk.sensor_mut().lift();
        outcome.map(|()| first)
    }

    fn release(&mut self) -> Result<(), TargetError> {
        self.kiosk.sensor_mut().lift();
        self.step_clock(self.poll_interval).map(|_| ())
    }

    fn advance(&mut self, by: Duration) -> Result<(), TargetError> {
        self.kiosk.sensor_mut().lift();
        let mut remaining = by;
        while !remaining.is_zero() {
            let slice = remaining.min(self.poll_interval.max(Duration::from_millis(1)));
            self.step_clock(slice)?;
            remaining -= slice;
        }
        Ok(())
    }

    fn screen(&self) -> ScreenState {
        self.kiosk.state()
    }

    fn status(&self) -> StatusSnapshot {
        StatusSnapshot::capture(&self.kiosk, self.clock.now())
    }

    fn tickets(&self) -> &[Ticket] {
        self.kiosk.context().queue.as_slice()
    }

    fn history(&self) -> &EventRecorder {
        self.kiosk.history()
    }
}

// Timed pointer movement and clicking on top of a raw device
use super::device::PointerDevice;
use crate::automation::config::ClickSpec;
use crate::automation::events::{AutomationEvent, EventSink, LogSink};
use crate::automation::sleep::{Sleeper, ThreadSleeper};
use crate::error::AutomationResult;
use crate::template_matching::Point;
use std::sync::Arc;
use std::time::Duration;

/// Pause between intermediate pointer positions while gliding
const MOVE_STEP: Duration = Duration::from_millis(10);
/// Upper bound on intermediate positions; longer glides take longer steps
const MAX_GLIDE_STEPS: u32 = 1000;

pub struct PointerActuator<D> {
    device: D,
    sleeper: Arc<dyn Sleeper>,
    sink: Arc<dyn EventSink>,
}

impl<D: PointerDevice> PointerActuator<D> {
    pub fn new(device: D) -> Self {
        Self::with_hooks(device, Arc::new(ThreadSleeper), Arc::new(LogSink))
    }

    pub fn with_hooks(device: D, sleeper: Arc<dyn Sleeper>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            device,
            sleeper,
            sink,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Move to `point` and click it `spec.clicks` times.
    ///
    /// Never fails: device errors are reported as `ClickFailed` and the
    /// remaining clicks are dropped.
    pub fn click_at(&mut self, point: Point, spec: &ClickSpec) {
        match self.try_click_at(point, spec) {
            Ok(()) => self.sink.emit(AutomationEvent::ClickIssued {
                point,
                clicks: spec.clicks,
            }),
            Err(e) => self.sink.emit(AutomationEvent::ClickFailed {
                point,
                description: e.to_string(),
            }),
        }
    }

    fn try_click_at(&mut self, point: Point, spec: &ClickSpec) -> AutomationResult<()> {
        self.glide_to(point, spec.move_duration())?;

        for i in 0..spec.clicks {
            if i > 0 {
                self.sleeper.sleep(spec.click_interval());
            }
            self.device.click()?;
        }
        Ok(())
    }

    /// Linear movement from the current position; a single jump when the
    /// duration is zero or the position cannot be read.
    fn glide_to(&mut self, target: Point, duration: Duration) -> AutomationResult<()> {
        let start = if duration.is_zero() {
            None
        } else {
            self.device.position().ok()
        };
        let Some(start) = start else {
            return self.device.move_to(target);
        };

        let steps = u32::try_from(duration.as_millis() / MOVE_STEP.as_millis())
            .unwrap_or(MAX_GLIDE_STEPS)
            .clamp(1, MAX_GLIDE_STEPS);
        let pause = duration / steps;
        for step in 1..=steps {
            self.device.move_to(interpolate(start, target, step, steps))?;
            self.sleeper.sleep(pause);
        }
        Ok(())
    }
}

/// Point `step`/`steps` of the way from `from` to `to`, rounded to pixels.
pub fn interpolate(from: Point, to: Point, step: u32, steps: u32) -> Point {
    let t = f64::from(step) / f64::from(steps.max(1));
    let lerp = |a: u32, b: u32| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u32;
    Point::new(lerp(from.x, to.x), lerp(from.y, to.y))
}

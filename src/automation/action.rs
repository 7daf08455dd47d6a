// Locate a template, click its center, let the UI settle
use super::config::{ActionConfig, ClickSpec, RetryPolicy};
use super::events::{EventSink, LogSink};
use super::locator::RetryingLocator;
use super::sleep::{Sleeper, ThreadSleeper};
use crate::pointer::{PointerActuator, PointerDevice};
use crate::screen::ScreenCapturer;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// The unit a workflow calls: `perform` answers whether the element was
/// found and clicked.
pub struct LocateAndClick<C, D> {
    locator: RetryingLocator<C>,
    actuator: PointerActuator<D>,
    sleeper: Arc<dyn Sleeper>,
}

impl<C: ScreenCapturer, D: PointerDevice> LocateAndClick<C, D> {
    pub fn new(capturer: C, device: D) -> Self {
        Self::with_hooks(capturer, device, Arc::new(ThreadSleeper), Arc::new(LogSink))
    }

    pub fn with_hooks(
        capturer: C,
        device: D,
        sleeper: Arc<dyn Sleeper>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            locator: RetryingLocator::with_hooks(capturer, sleeper.clone(), sink.clone()),
            actuator: PointerActuator::with_hooks(device, sleeper.clone(), sink),
            sleeper,
        }
    }

    pub fn locator(&self) -> &RetryingLocator<C> {
        &self.locator
    }

    pub fn actuator(&self) -> &PointerActuator<D> {
        &self.actuator
    }

    /// Returns `false` without touching the pointer when the template is not
    /// found; otherwise clicks, waits `settle` and returns `true`.
    pub fn perform(
        &mut self,
        template: &Path,
        retry: &RetryPolicy,
        click: &ClickSpec,
        settle: Duration,
    ) -> bool {
        let Some(point) = self.locator.locate(template, retry).point() else {
            return false;
        };

        self.actuator.click_at(point, click);
        self.sleeper.sleep(settle);
        true
    }

    pub fn perform_with(&mut self, template: &Path, config: &ActionConfig) -> bool {
        self.perform(template, &config.retry, &config.click, config.settle())
    }
}

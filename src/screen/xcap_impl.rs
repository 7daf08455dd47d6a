// Primary-monitor capture through xcap
use super::types::{PixelBuffer, ScreenCapturer};
use crate::error::{AutomationError, AutomationResult};
use xcap::Monitor;

/// Captures the whole primary monitor at its native resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapScreen;

impl XcapScreen {
    pub fn new() -> Self {
        Self
    }

    fn primary_monitor() -> AutomationResult<Monitor> {
        let monitors = Monitor::all().map_err(AutomationError::capture)?;
        if monitors.is_empty() {
            return Err(AutomationError::NoDisplay);
        }

        // Some platforms never flag a primary monitor, take the first one then
        let primary = monitors
            .iter()
            .position(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(0);
        monitors
            .into_iter()
            .nth(primary)
            .ok_or(AutomationError::NoDisplay)
    }
}

impl ScreenCapturer for XcapScreen {
    fn capture(&self) -> AutomationResult<PixelBuffer> {
        let monitor = Self::primary_monitor()?;
        let image = monitor.capture_image().map_err(AutomationError::capture)?;
        let (width, height) = (image.width(), image.height());

        // Rebuild from raw bytes so xcap's image re-export never has to match ours
        PixelBuffer::from_raw(width, height, image.into_raw()).ok_or_else(|| {
            AutomationError::capture(format!(
                "monitor returned a malformed {width}x{height} buffer"
            ))
        })
    }
}

// Screenshot replay from disk
use super::types::{PixelBuffer, ScreenCapturer};
use crate::error::{AutomationError, AutomationResult};
use std::path::{Path, PathBuf};

/// Serves a saved screenshot as if it were the live display.
///
/// The file is decoded on every capture, so replacing it between attempts
/// behaves like a changing screen.
#[derive(Debug, Clone)]
pub struct ImageFileScreen {
    path: PathBuf,
}

impl ImageFileScreen {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScreenCapturer for ImageFileScreen {
    fn capture(&self) -> AutomationResult<PixelBuffer> {
        let image = image::open(&self.path).map_err(|e| {
            AutomationError::capture(format!("cannot read {}: {e}", self.path.display()))
        })?;
        Ok(PixelBuffer::new(image.to_rgba8()))
    }
}

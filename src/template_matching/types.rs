/// Template matching data types
use crate::error::{AutomationError, AutomationResult};
use image::GrayImage;
use std::path::{Path, PathBuf};

/// A pixel position on the captured screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A reference image, reduced to intensity for matching
#[derive(Debug, Clone)]
pub struct Template {
    /// Where the template was loaded from
    pub path: PathBuf,
    /// Single-channel pixels
    pub gray: GrayImage,
}

impl Template {
    /// Load and convert a template image; any decode or I/O failure is a
    /// `TemplateLoad` error.
    pub fn load(path: impl AsRef<Path>) -> AutomationResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| AutomationError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            gray: image.to_luma8(),
        })
    }

    pub fn from_gray(path: impl Into<PathBuf>, gray: GrayImage) -> Self {
        Self {
            path: path.into(),
            gray,
        }
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    /// Display name for logs (file stem)
    pub fn name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
    }
}

/// The best alignment of a template on a screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Top-left corner of the aligned region
    pub top_left: Point,
    /// Template width in pixels
    pub width: u32,
    /// Template height in pixels
    pub height: u32,
    /// Zero-mean normalized cross-correlation (-1.0..=1.0)
    pub confidence: f32,
}

impl MatchResult {
    /// Center of the matched region, the point to click
    pub fn center(&self) -> Point {
        Point::new(
            self.top_left.x + self.width / 2,
            self.top_left.y + self.height / 2,
        )
    }

    /// Check if the click point lies on a screen of the given size
    pub fn is_within_bounds(&self, screen_width: u32, screen_height: u32) -> bool {
        let center = self.center();
        center.x < screen_width && center.y < screen_height
    }
}

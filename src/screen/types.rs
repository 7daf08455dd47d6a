// Core screen types
use crate::error::AutomationResult;
use image::{DynamicImage, GrayImage, RgbaImage};

/// One immutable capture of the display, always in RGBA channel order.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Wrap raw RGBA bytes; `None` when the length does not fit the dimensions.
    pub fn from_raw(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, rgba).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Single-channel intensity view used by the matcher.
    pub fn to_luma(&self) -> GrayImage {
        DynamicImage::ImageRgba8(self.image.clone()).to_luma8()
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

/// Anything that can produce a fresh snapshot of the screen.
pub trait ScreenCapturer {
    fn capture(&self) -> AutomationResult<PixelBuffer>;
}

impl<T: ScreenCapturer + ?Sized> ScreenCapturer for &T {
    fn capture(&self) -> AutomationResult<PixelBuffer> {
        (**self).capture()
    }
}

impl<T: ScreenCapturer + ?Sized> ScreenCapturer for Box<T> {
    fn capture(&self) -> AutomationResult<PixelBuffer> {
        (**self).capture()
    }
}

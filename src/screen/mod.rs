// Screen module - snapshots of the display as RGBA pixel buffers.
// The desktop backend reads the primary monitor through xcap; the file
// backend replays a saved screenshot so templates can be checked offline.

pub mod file_impl;
pub mod types;
pub mod xcap_impl;

pub use file_impl::ImageFileScreen;
pub use types::{PixelBuffer, ScreenCapturer};
pub use xcap_impl::XcapScreen;

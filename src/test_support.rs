// Shared fakes for unit tests: synthetic images, a scripted screen,
// a recording pointer, sleeper and event sink.
use crate::automation::events::{AutomationEvent, EventSink};
use crate::automation::sleep::Sleeper;
use crate::error::{AutomationError, AutomationResult};
use crate::pointer::PointerDevice;
use crate::screen::{PixelBuffer, ScreenCapturer};
use crate::template_matching::Point;
use image::{GrayImage, Luma, Rgba, RgbaImage, imageops};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn noise_screen(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let image = RgbaImage::from_fn(width, height, |_, _| {
        Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), 255])
    });
    PixelBuffer::new(image)
}

pub fn noise_gray(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |_, _| Luma([rng.r#gen()]))
}

/// Save a crop of `screen` (as intensity) to `dir/name` and return the path.
pub fn save_crop(
    dir: &Path,
    name: &str,
    screen: &PixelBuffer,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> PathBuf {
    let path = dir.join(name);
    imageops::crop_imm(&screen.to_luma(), x, y, width, height)
        .to_image()
        .save(&path)
        .unwrap();
    path
}

pub fn save_noise(dir: &Path, name: &str, seed: u64) -> PathBuf {
    let path = dir.join(name);
    noise_gray(24, 16, seed).save(&path).unwrap();
    path
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AutomationEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<AutomationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: AutomationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Plays back a fixed list of frames; the last frame repeats forever.
/// A `None` frame simulates a capture failure.
pub struct ScriptedScreen {
    frames: Vec<Option<PixelBuffer>>,
    captures: AtomicUsize,
}

impl ScriptedScreen {
    pub fn new(frames: Vec<Option<PixelBuffer>>) -> Self {
        assert!(!frames.is_empty());
        Self {
            frames,
            captures: AtomicUsize::new(0),
        }
    }

    pub fn repeating(frame: PixelBuffer) -> Self {
        Self::new(vec![Some(frame)])
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

impl ScreenCapturer for ScriptedScreen {
    fn capture(&self) -> AutomationResult<PixelBuffer> {
        let index = self.captures.fetch_add(1, Ordering::SeqCst);
        let frame = &self.frames[index.min(self.frames.len() - 1)];
        frame
            .clone()
            .ok_or_else(|| AutomationError::capture("display went away"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerCall {
    MoveTo(Point),
    Click,
}

/// Pointer that records calls and optionally fails clicks.
#[derive(Default)]
pub struct RecordingPointer {
    pub calls: Vec<PointerCall>,
    pub position: Option<Point>,
    pub fail_clicks: bool,
}

impl RecordingPointer {
    pub fn clicks(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == PointerCall::Click)
            .count()
    }

    pub fn moves(&self) -> Vec<Point> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PointerCall::MoveTo(p) => Some(*p),
                PointerCall::Click => None,
            })
            .collect()
    }
}

impl PointerDevice for RecordingPointer {
    fn position(&mut self) -> AutomationResult<Point> {
        self.position
            .ok_or_else(|| AutomationError::actuation("query", "position unknown"))
    }

    fn move_to(&mut self, point: Point) -> AutomationResult<()> {
        self.calls.push(PointerCall::MoveTo(point));
        self.position = Some(point);
        Ok(())
    }

    fn click(&mut self) -> AutomationResult<()> {
        if self.fail_clicks {
            return Err(AutomationError::actuation("click", "input injection refused"));
        }
        self.calls.push(PointerCall::Click);
        Ok(())
    }
}

//! Common test utilities for console tests.

use std::cell::RefCell;
use std::rc::Rc;

use cam_console::camera::{CameraDevice, CameraSettings, Frame, SimulatedCamera};
use cam_console::config::Config;
use cam_console::console::{Console, SessionStats};
use cam_console::error::Result;

/// Wraps a simulated camera and records every apply call.
pub struct RecordingCamera {
    inner: SimulatedCamera,
    pub applied: Rc<RefCell<Vec<CameraSettings>>>,
}

impl RecordingCamera {
    pub fn new(memory_limit: usize) -> Self {
        Self {
            inner: SimulatedCamera::new(CameraSettings::default(), memory_limit),
            applied: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn failing(mut self, attempts: u32) -> Self {
        self.inner = self.inner.with_failures(attempts);
        self
    }
}

impl CameraDevice for RecordingCamera {
    fn apply(&mut self, settings: &CameraSettings) -> Result<()> {
        self.applied.borrow_mut().push(*settings);
        self.inner.apply(settings)
    }

    fn settings(&self) -> &CameraSettings {
        self.inner.settings()
    }

    fn capture(&mut self) -> Result<Frame> {
        self.inner.capture()
    }
}

/// A test config with no retry delays.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.camera.retry_delay_ms = 0;
    config.registry.retry_delay_ms = 0;
    config
}

pub fn console_with(camera: RecordingCamera) -> Console<RecordingCamera> {
    Console::from_config(&test_config(), camera)
}

pub fn console() -> Console<RecordingCamera> {
    console_with(RecordingCamera::new(196_608))
}

/// Feeds `input` through a whole session and returns the stats and raw output.
pub fn session(console: &mut Console<RecordingCamera>, input: &[u8]) -> (SessionStats, Vec<u8>) {
    let mut out = Vec::new();
    let stats = console.run(input, &mut out).expect("session failed");
    (stats, out)
}

/// Like [`session`], for text-only replies.
pub fn session_text(console: &mut Console<RecordingCamera>, input: &str) -> String {
    let (_, out) = session(console, input.as_bytes());
    String::from_utf8(out).expect("reply is not UTF-8")
}

//! In-process camera implementations.
//!
//! `SimulatedCamera` stands in for the physical sensor: it produces a
//! deterministic test pattern and enforces a frame memory budget.
//! `FailingCamera` rejects everything, for exercising error paths.

use super::{CameraDevice, CameraSettings, Frame, PixelFormat};
use crate::error::{ConsoleError, Result};

/// A camera that synthesizes frames in memory.
#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    settings: CameraSettings,
    memory_limit: usize,
    failures_left: u32,
    applied: u32,
    captured: u32,
}

impl SimulatedCamera {
    /// Creates a camera with the given initial settings and frame budget.
    pub fn new(settings: CameraSettings, memory_limit: usize) -> Self {
        Self {
            settings,
            memory_limit,
            failures_left: 0,
            applied: 0,
            captured: 0,
        }
    }

    /// Makes the next `count` apply attempts fail.
    pub fn with_failures(mut self, count: u32) -> Self {
        self.failures_left = count;
        self
    }

    /// Number of apply attempts seen so far, failed ones included.
    pub fn apply_attempts(&self) -> u32 {
        self.applied
    }

    /// Number of frames captured so far.
    pub fn captures(&self) -> u32 {
        self.captured
    }

    fn fill_pattern(settings: &CameraSettings, data: &mut Vec<u8>) {
        let (width, height) = settings.resolution.dimensions();
        for y in 0..height {
            for x in 0..width {
                match settings.format {
                    PixelFormat::Grayscale => {
                        data.push(((x + y) % 256) as u8);
                    }
                    _ => {
                        // RGB565 gradient: red across, green down, blue fixed.
                        let r = (x * 31 / width.max(1)) as u16;
                        let g = (y * 63 / height.max(1)) as u16;
                        let b = 0x10u16;
                        let pixel = (r << 11) | (g << 5) | b;
                        data.extend_from_slice(&pixel.to_be_bytes());
                    }
                }
            }
        }
    }
}

impl CameraDevice for SimulatedCamera {
    fn apply(&mut self, settings: &CameraSettings) -> Result<()> {
        self.applied += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(ConsoleError::device_config("sensor did not acknowledge"));
        }
        self.settings = *settings;
        Ok(())
    }

    fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    fn capture(&mut self) -> Result<Frame> {
        let size = self.settings.frame_size();
        if size > self.memory_limit {
            return Err(ConsoleError::ResourceExhaustion {
                requested: size,
                limit: self.memory_limit,
            });
        }

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| ConsoleError::ResourceExhaustion {
                requested: size,
                limit: self.memory_limit,
            })?;
        Self::fill_pattern(&self.settings, &mut data);
        self.captured += 1;

        Ok(Frame {
            settings: self.settings,
            data,
        })
    }
}

/// A camera whose every operation fails.
#[derive(Debug, Clone, Default)]
pub struct FailingCamera {
    settings: CameraSettings,
}

impl FailingCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraDevice for FailingCamera {
    fn apply(&mut self, _settings: &CameraSettings) -> Result<()> {
        Err(ConsoleError::device_config("no sensor attached"))
    }

    fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    fn capture(&mut self) -> Result<Frame> {
        Err(ConsoleError::capture("no sensor attached"))
    }
}

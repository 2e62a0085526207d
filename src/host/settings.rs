//! Parsing of the `getCameraSettings` report on the host side.

use regex::Regex;

use crate::camera::{PixelFormat, Resolution};
use crate::error::{ConsoleError, Result};

const RESOLUTION_PATTERN: &str = r"Resolution:\s*\w+\s*\((\d+)x(\d+)\)";
const FORMAT_PATTERN: &str = r"Format:\s*(\w+)";

/// Frame geometry reported by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedSettings {
    pub width: usize,
    pub height: usize,
    /// Format name as printed, e.g. `RGB565`.
    pub format: String,
}

impl ReportedSettings {
    /// Extracts resolution and format from a settings report.
    pub fn parse(report: &str) -> Result<Self> {
        let resolution = Regex::new(RESOLUTION_PATTERN)
            .map_err(|e| ConsoleError::protocol(e.to_string()))?;
        let format =
            Regex::new(FORMAT_PATTERN).map_err(|e| ConsoleError::protocol(e.to_string()))?;

        let caps = resolution
            .captures(report)
            .ok_or_else(|| ConsoleError::protocol("Failed to extract resolution"))?;
        let width = caps[1]
            .parse()
            .map_err(|_| ConsoleError::protocol(format!("Bad width: {}", &caps[1])))?;
        let height = caps[2]
            .parse()
            .map_err(|_| ConsoleError::protocol(format!("Bad height: {}", &caps[2])))?;

        let (max_width, max_height) = Resolution::Vga.dimensions();
        if width > max_width || height > max_height {
            return Err(ConsoleError::protocol(format!(
                "Reported resolution {width}x{height} exceeds {max_width}x{max_height}"
            )));
        }

        let format = format
            .captures(report)
            .ok_or_else(|| ConsoleError::protocol("Failed to extract format"))?[1]
            .to_string();

        Ok(Self {
            width,
            height,
            format,
        })
    }

    /// The reported format, if it is one this crate knows.
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        PixelFormat::from_name(&self.format)
    }

    /// Bytes per pixel. Unknown formats are assumed to be 2 bytes wide.
    pub fn bytes_per_pixel(&self) -> usize {
        self.pixel_format().map_or(2, |f| f.bytes_per_pixel())
    }

    /// Expected size of a `takePhoto` payload, excluding the CRLF sentinel.
    pub fn frame_size(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(self.bytes_per_pixel()))
            .ok_or_else(|| {
                ConsoleError::protocol(format!(
                    "Frame size overflows for {}x{}",
                    self.width, self.height
                ))
            })
    }
}

//! Camera setting types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sensor output resolutions, indexed the way the console accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Vga,
    Cif,
    #[default]
    Qvga,
    Qcif,
    Qqvga,
}

impl Resolution {
    /// All resolutions in console index order.
    pub const ALL: [Resolution; 5] = [
        Self::Vga,
        Self::Cif,
        Self::Qvga,
        Self::Qcif,
        Self::Qqvga,
    ];

    /// Looks up a resolution by its console index (0-4).
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    /// Short sensor name, e.g. `QVGA`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vga => "VGA",
            Self::Cif => "CIF",
            Self::Qvga => "QVGA",
            Self::Qcif => "QCIF",
            Self::Qqvga => "QQVGA",
        }
    }

    /// Frame dimensions as (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Vga => (640, 480),
            Self::Cif => (352, 240),
            Self::Qvga => (320, 240),
            Self::Qcif => (176, 144),
            Self::Qqvga => (160, 120),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "{} ({width}x{height})", self.name())
    }
}

/// Sensor pixel formats, indexed the way the console accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Yuv422,
    Rgb444,
    #[default]
    Rgb565,
    Grayscale,
}

impl PixelFormat {
    /// All formats in console index order.
    pub const ALL: [PixelFormat; 4] = [Self::Yuv422, Self::Rgb444, Self::Rgb565, Self::Grayscale];

    /// Looks up a format by its console index (0-3).
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    /// Looks up a format by its short name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// The sensor driver's numeric code. Grayscale is 4, not 3.
    pub fn driver_code(&self) -> u8 {
        match self {
            Self::Yuv422 => 0,
            Self::Rgb444 => 1,
            Self::Rgb565 => 2,
            Self::Grayscale => 4,
        }
    }

    /// Short sensor name, e.g. `RGB565`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yuv422 => "YUV422",
            Self::Rgb444 => "RGB444",
            Self::Rgb565 => "RGB565",
            Self::Grayscale => "GRAYSCALE",
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Grayscale => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bpp = self.bytes_per_pixel();
        let unit = if bpp == 1 { "byte" } else { "bytes" };
        write!(f, "{} ({bpp} {unit} per pixel)", self.name())
    }
}

/// Supported sensor models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraModel {
    Ov7670,
    #[default]
    Ov7675,
}

impl fmt::Display for CameraModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ov7670 => write!(f, "OV7670"),
            Self::Ov7675 => write!(f, "OV7675"),
        }
    }
}

/// Board pin labels wired to the sensor.
pub const PIN_MAP: [(&str, &str); 12] = [
    ("VSYNC_PIN", "8"),
    ("HREF_PIN", "A1"),
    ("PCLK_PIN", "A0"),
    ("XCLK_PIN", "9"),
    ("D0_PIN", "1"),
    ("D1_PIN", "10"),
    ("D2_PIN", "0"),
    ("D3_PIN", "2"),
    ("D4_PIN", "3"),
    ("D5_PIN", "5"),
    ("D6_PIN", "6"),
    ("D7_PIN", "4"),
];

/// The parameter set applied to the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default)]
    pub model: CameraModel,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub format: PixelFormat,
    #[serde(default = "default_fps")]
    pub fps: u8,
}

fn default_fps() -> u8 {
    1
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            model: CameraModel::default(),
            resolution: Resolution::default(),
            format: PixelFormat::default(),
            fps: default_fps(),
        }
    }
}

impl CameraSettings {
    /// Returns a copy with a different resolution.
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        Self { resolution, ..self }
    }

    /// Returns a copy with a different pixel format.
    pub fn with_format(self, format: PixelFormat) -> Self {
        Self { format, ..self }
    }

    /// Size in bytes of one frame at these settings.
    pub fn frame_size(&self) -> usize {
        let (width, height) = self.resolution.dimensions();
        width * height * self.format.bytes_per_pixel()
    }

    /// Renders the settings report printed by `getCameraSettings`.
    pub fn report(&self) -> Vec<String> {
        let mut lines = vec![
            "Current camera settings:".to_string(),
            format!("\tModel: {}.", self.model),
        ];
        lines.extend(PIN_MAP.iter().map(|(pin, label)| format!("\t{pin}: {label}")));
        lines.push(format!("\tResolution: {}.", self.resolution));
        lines.push(format!("\tFormat: {}.", self.format));
        lines.push(format!("\tFPS: {}.", self.fps));
        lines
    }
}

/// One captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub settings: CameraSettings,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

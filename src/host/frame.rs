//! Decoding of raw `takePhoto` payloads into RGB images.

use std::io::Write;

use crate::camera::PixelFormat;
use crate::error::{ConsoleError, Result};

/// A decoded 8-bit RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    /// Row-major RGB triples.
    pub pixels: Vec<u8>,
}

impl RgbImage {
    /// Writes the image as a binary PPM (P6).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(&self.pixels)?;
        out.flush()?;
        Ok(())
    }
}

/// Swaps the two least significant bits of a byte.
///
/// The sensor wiring crosses D0 and D1, so raw bytes arrive with these two
/// bits exchanged.
pub fn shuffle_bits(byte: u8) -> u8 {
    (byte & 0xFC) | ((byte & 0x01) << 1) | ((byte & 0x02) >> 1)
}

/// Decodes a raw frame.
///
/// RGB565 pixels are big-endian byte pairs; GRAYSCALE is one byte per pixel.
/// Other formats cannot be decoded.
pub fn decode(
    raw: &[u8],
    width: usize,
    height: usize,
    format: PixelFormat,
    bit_shuffle: bool,
) -> Result<RgbImage> {
    let bpp = format.bytes_per_pixel();
    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(bpp))
        .ok_or_else(|| {
            ConsoleError::protocol(format!("Frame size overflows for {width}x{height}"))
        })?;
    if raw.len() < expected {
        return Err(ConsoleError::protocol(format!(
            "Frame too short: expected {expected} bytes, got {}",
            raw.len()
        )));
    }

    let fix = |b: u8| if bit_shuffle { shuffle_bits(b) } else { b };
    let mut pixels = Vec::with_capacity(expected / bpp * 3);

    match format {
        PixelFormat::Rgb565 => {
            for pair in raw[..expected].chunks_exact(2) {
                let (high, low) = (fix(pair[0]), fix(pair[1]));
                let red = ((high >> 3) & 0x1F) << 3;
                let green = ((high & 0x07) << 5) | (((low >> 5) & 0x07) << 2);
                let blue = (low & 0x1F) << 3;
                pixels.extend_from_slice(&[red, green, blue]);
            }
        }
        PixelFormat::Grayscale => {
            for &b in &raw[..expected] {
                let v = fix(b);
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        other => {
            return Err(ConsoleError::protocol(format!(
                "Cannot decode {} frames",
                other.name()
            )))
        }
    }

    Ok(RgbImage {
        width,
        height,
        pixels,
    })
}

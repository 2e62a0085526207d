//! Host-side client for talking to a camera console.
//!
//! Replies carry no length or end marker. Text replies are read until the
//! stream goes quiet (read timeout), closes, or a size cap is reached; photo
//! payloads are read by their expected size, which comes from the settings
//! report.

mod frame;
mod settings;

pub use frame::{decode, shuffle_bits, RgbImage};
pub use settings::ReportedSettings;

use std::io::{self, Read, Write};

use tracing::{debug, info};

use crate::error::{ConsoleError, Result};

/// Default cap for text replies, in bytes.
pub const DEFAULT_REPLY_LIMIT: usize = 512;

const SETTINGS_END: &str = "FPS:";

/// Client side of the console protocol.
pub struct HostClient<S> {
    stream: S,
    reply_limit: usize,
}

impl<S: Read + Write> HostClient<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            reply_limit: DEFAULT_REPLY_LIMIT,
        }
    }

    /// Sets the cap for text replies.
    pub fn with_reply_limit(mut self, limit: usize) -> Self {
        self.reply_limit = limit;
        self
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn send(&mut self, line: &str) -> Result<()> {
        debug!(line, "sending");
        self.stream.write_all(line.as_bytes())?;
        self.stream.write_all(b"\r")?;
        self.stream.flush()?;
        Ok(())
    }

    /// Reads until `done` says so, the stream closes or times out, or the cap
    /// is hit.
    fn read_reply(&mut self, done: impl Fn(&[u8]) -> bool) -> Result<Vec<u8>> {
        let mut reply = Vec::new();
        let mut byte = [0u8; 1];

        // One byte at a time, so nothing past the reply is consumed.
        while reply.len() < self.reply_limit && !done(&reply) {
            match self.stream.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => reply.push(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
                {
                    break
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(bytes = reply.len(), "reply received");
        Ok(reply)
    }

    /// Sends one command line and returns the text reply.
    pub fn send_line(&mut self, line: &str) -> Result<String> {
        self.send(line)?;
        let reply = self.read_reply(|_| false)?;
        Ok(String::from_utf8_lossy(&reply).into_owned())
    }

    /// Queries and parses the camera settings.
    pub fn camera_settings(&mut self) -> Result<ReportedSettings> {
        self.send("getCameraSettings")?;
        let reply = self.read_reply(|buf| {
            buf.ends_with(b"\r\n") && String::from_utf8_lossy(buf).contains(SETTINGS_END)
        })?;
        let settings = ReportedSettings::parse(&String::from_utf8_lossy(&reply))?;
        info!(
            "Camera resolution: {}x{}; format: {}",
            settings.width, settings.height, settings.format
        );
        Ok(settings)
    }

    /// Takes a photo and returns the raw payload along with the settings it
    /// was taken with.
    pub fn request_photo(&mut self) -> Result<(ReportedSettings, Vec<u8>)> {
        let settings = self.camera_settings()?;
        let size = settings.frame_size()?;

        self.send("takePhoto")?;
        let mut payload = vec![0u8; size + 2];
        self.stream.read_exact(&mut payload).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                ConsoleError::protocol(format!("Frame ended before {size} bytes arrived"))
            } else {
                e.into()
            }
        })?;

        if !payload.ends_with(b"\r\n") {
            return Err(ConsoleError::protocol("Frame is not followed by CRLF"));
        }
        payload.truncate(size);
        info!(bytes = size, "Photo received");
        Ok((settings, payload))
    }

    /// Takes a photo and decodes it.
    pub fn fetch_image(&mut self, bit_shuffle: bool) -> Result<RgbImage> {
        let (settings, raw) = self.request_photo()?;
        let format = settings.pixel_format().ok_or_else(|| {
            ConsoleError::protocol(format!("Unknown format {}", settings.format))
        })?;
        decode(&raw, settings.width, settings.height, format, bit_shuffle)
    }
}

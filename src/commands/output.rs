//! Console output framing.
//!
//! Text goes out as CRLF-terminated lines. Binary payloads are written as-is
//! and followed by a bare CRLF sentinel; the receiver has to know the payload
//! length in advance, since no length prefix is sent.

use std::fmt::Display;
use std::io::{self, Write};

const CRLF: &[u8] = b"\r\n";

/// Writer for everything a command sends back over the console.
pub struct CommandOutput<'a> {
    inner: &'a mut dyn Write,
}

impl<'a> CommandOutput<'a> {
    /// Wraps a byte sink.
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner }
    }

    /// Writes `text` as one or more CRLF-terminated lines.
    ///
    /// Embedded `\n` characters start new lines.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        let text = text.to_string();
        for line in text.split('\n') {
            self.inner.write_all(line.trim_end_matches('\r').as_bytes())?;
            self.inner.write_all(CRLF)?;
        }
        Ok(())
    }

    /// Writes several lines.
    pub fn lines<I, T>(&mut self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for line in lines {
            self.line(line)?;
        }
        Ok(())
    }

    /// Writes a binary payload followed by the CRLF sentinel.
    pub fn payload(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.inner.write_all(CRLF)
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

//! Line framing for console input.

use std::io::{self, BufRead, BufReader, Read};

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Fixed-width input line buffer.
///
/// The storage is zeroed on every clear, so whatever the tokenizer sees past
/// `len` is always NUL.
#[derive(Debug, Clone)]
pub struct RawLine {
    buf: Box<[u8]>,
    len: usize,
}

impl RawLine {
    /// Creates an empty line of `width` bytes.
    pub fn new(width: usize) -> Self {
        Self {
            buf: vec![0u8; width].into_boxed_slice(),
            len: 0,
        }
    }

    /// Appends a byte. Returns false if the line is full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        true
    }

    /// Empties the line and zeroes its storage.
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.len = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }
}

/// Reads terminated lines from a byte stream.
///
/// A line ends at CR, at LF when `lf_terminates` is set, or when the buffer
/// fills up. An LF immediately following a CR is dropped, so CRLF counts as a
/// single terminator. Bytes past a full buffer start the next line.
pub struct LineReader<R> {
    inner: BufReader<R>,
    lf_terminates: bool,
    skip_lf: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R, lf_terminates: bool) -> Self {
        Self {
            inner: BufReader::new(inner),
            lf_terminates,
            skip_lf: false,
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let Some(&byte) = available.first() else {
                return Ok(None);
            };
            self.inner.consume(1);
            return Ok(Some(byte));
        }
    }

    /// Reads the next line into `line`, clearing it first.
    ///
    /// Returns the number of bytes stored, or `None` when the stream ended
    /// before any byte of a new line arrived. A partial line at end of stream
    /// is returned as a line.
    pub fn read_line(&mut self, line: &mut RawLine) -> io::Result<Option<usize>> {
        line.clear();
        let mut seen_any = false;

        while let Some(byte) = self.next_byte()? {
            if std::mem::take(&mut self.skip_lf) && byte == LF {
                continue;
            }
            seen_any = true;

            match byte {
                CR => {
                    self.skip_lf = true;
                    return Ok(Some(line.len()));
                }
                LF if self.lf_terminates => return Ok(Some(line.len())),
                _ => {
                    line.push(byte);
                    if line.is_full() {
                        return Ok(Some(line.len()));
                    }
                }
            }
        }

        Ok(seen_any.then(|| line.len()))
    }
}

//! Line-oriented channel over a byte stream
//!
//! Wraps any `Read + Write` stream (a serial port in production, a scripted
//! buffer in tests) and hands out complete newline-terminated lines.

use std::io::{self, ErrorKind, Read, Write};

/// Read buffer size per poll
const READ_CHUNK: usize = 256;

/// Longest unfinished line kept between polls
pub const MAX_PENDING: usize = 4096;

/// Newline-delimited text channel
pub struct LineChannel<S> {
    stream: S,
    pending: Vec<u8>,
}

impl<S: Read + Write> LineChannel<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            pending: Vec::new(),
        }
    }

    /// Write `text` followed by a newline and flush
    pub fn send_line(&mut self, text: &str) -> io::Result<()> {
        self.stream.write_all(text.as_bytes())?;
        self.stream.write_all(b"\n")?;
        self.stream.flush()
    }

    /// Poll for the next complete line.
    ///
    /// Performs at most one read. Returns `Ok(None)` when that read timed
    /// out, returned no data, or did not complete a line, so the caller gets
    /// control back after every read. Bytes of an unfinished line are kept
    /// and completed by later polls. Lines are decoded lossily and trimmed,
    /// so `\r\n` endings and stray whitespace disappear.
    ///
    /// An unfinished line longer than [`MAX_PENDING`] bytes is discarded.
    pub fn poll_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.take_line() {
            return Ok(Some(line));
        }

        let mut buffer = [0u8; READ_CHUNK];
        let n = loop {
            match self.stream.read(&mut buffer) {
                Ok(n) => break n,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(ref e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        };
        self.pending.extend_from_slice(&buffer[..n]);

        if let Some(line) = self.take_line() {
            return Ok(Some(line));
        }
        if self.pending.len() > MAX_PENDING {
            log::warn!(
                "Discarding {} bytes received without a newline",
                self.pending.len()
            );
            self.pending.clear();
        }
        Ok(None)
    }

    fn take_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = self.pending.drain(..=pos).collect();
        Some(decode_line(&raw[..pos]))
    }

    /// Bytes received that do not yet form a complete line
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}


#[cfg(test)]
mod tests {
    use super::testing::{EndlessStream, ScriptedStream};
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_send_line_appends_newline() {
        let mut channel = LineChannel::new(ScriptedStream::new());
        channel.send_line("READ_SD").unwrap();
        assert_eq!(channel.get_ref().written, b"READ_SD\n");
    }

    #[test]
    fn test_line_split_across_polls() {
        let stream = ScriptedStream::new()
            .chunk(b"12.")
            .silence()
            .chunk(b"5\r\n");
        let mut channel = LineChannel::new(stream);

        assert_eq!(channel.poll_line().unwrap(), None);
        assert_eq!(channel.pending_len(), 3);
        assert_eq!(channel.poll_line().unwrap(), None);
        assert_eq!(channel.poll_line().unwrap().as_deref(), Some("12.5"));
        assert_eq!(channel.pending_len(), 0);
    }

    #[test]
    fn test_one_read_per_poll() {
        let stream = EndlessStream::new(b"boot log\r", Duration::ZERO);
        let mut channel = LineChannel::new(stream);

        for _ in 0..10 {
            assert_eq!(channel.poll_line().unwrap(), None);
        }
        assert_eq!(channel.pending_len(), 90);
    }

    #[test]
    fn test_unterminated_data_is_capped() {
        let stream = EndlessStream::new(&[0xAA; 200], Duration::ZERO);
        let mut channel = LineChannel::new(stream);

        for _ in 0..100 {
            assert_eq!(channel.poll_line().unwrap(), None);
            assert!(channel.pending_len() <= MAX_PENDING);
        }
    }

    #[test]
    fn test_line_after_discarded_garbage() {
        let mut garbage = vec![b'x'; MAX_PENDING + 1];
        garbage.push(b'\r');
        let mut stream = ScriptedStream::new();
        for piece in garbage.chunks(READ_CHUNK) {
            stream = stream.chunk(piece);
        }
        let mut channel = LineChannel::new(stream.chunk(b"\n42\n"));

        let mut lines = Vec::new();
        for _ in 0..40 {
            if let Some(line) = channel.poll_line().unwrap() {
                lines.push(line);
            }
        }
        assert_eq!(lines, vec!["".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_several_lines_in_one_chunk() {
        let stream = ScriptedStream::new().chunk(b"a\nb\nc");
        let mut channel = LineChannel::new(stream);

        assert_eq!(channel.poll_line().unwrap().as_deref(), Some("a"));
        assert_eq!(channel.poll_line().unwrap().as_deref(), Some("b"));
        assert_eq!(channel.poll_line().unwrap(), None);
        assert_eq!(channel.pending_len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let stream = ScriptedStream::new().chunk(b"4\xff2\n");
        let mut channel = LineChannel::new(stream);

        let line = channel.poll_line().unwrap().unwrap();
        assert!(line.starts_with('4'));
        assert!(line.ends_with('2'));
        assert!(line.contains('\u{FFFD}'));
    }

    #[test]
    fn test_hard_error_propagates() {
        let stream = ScriptedStream::new().failure(ErrorKind::BrokenPipe);
        let mut channel = LineChannel::new(stream);

        let err = channel.poll_line().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_interrupted_read_is_retried() {
        let stream = ScriptedStream::new()
            .failure(ErrorKind::Interrupted)
            .chunk(b"ok\n");
        let mut channel = LineChannel::new(stream);

        assert_eq!(channel.poll_line().unwrap().as_deref(), Some("ok"));
    }
}

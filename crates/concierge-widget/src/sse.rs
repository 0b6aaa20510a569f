//! Server-sent event framing: chunk reassembly and `data:` lines
//!
//! The transport delivers arbitrary byte chunks; event frames may be split
//! anywhere, including mid-codepoint. Only complete lines are ever decoded
//! — the trailing partial line stays buffered until its newline arrives.

/// Terminal sentinel payload ending a stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Reassembles byte chunks into complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every complete line it closes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buf[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            let line = &self.buf[start..end];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            lines.push(String::from_utf8_lossy(line).into_owned());
            start = end + 1;
        }
        self.buf.drain(..start);
        lines
    }
}

/// Extract the payload of a `data:` line. Returns `None` for blank lines,
/// non-data lines, and empty payloads.
pub fn data_payload(line: &str) -> Option<&str> {
    let payload = line.trim().strip_prefix("data:")?.trim();
    if payload.is_empty() { None } else { Some(payload) }
}

use tracing::trace;

/// Splits a raw worker byte stream into complete, trimmed lines.
///
/// Holds at most one unterminated trailing fragment between calls. A line
/// is only ever emitted once its `\n` terminator has been received, so a
/// line can never be split across two [`feed`](Self::feed) batches.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and return every line completed by them, in order.
    ///
    /// Lines are trimmed; empty lines are suppressed. Any trailing bytes
    /// after the last terminator stay buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        let remainder = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, remainder);

        let lines: Vec<String> = complete
            .split(|&b| b == b'\n')
            .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        trace!(
            lines = lines.len(),
            buffered = self.pending.len(),
            "Framed worker output"
        );

        lines
    }

    /// Discard any buffered partial line.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Number of bytes waiting for a terminator.
    pub fn buffered_len(&self) -> usize {
        self.pending.len()
    }
}

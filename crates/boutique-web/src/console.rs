//! Routing of formatted log records to the browser console.

use tracing::Level;

/// `console` method a record is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl ConsoleMethod {
    #[must_use]
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// Accumulates the bytes of one formatted record.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    bytes: Vec<u8>,
}

impl RecordBuffer {
    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Take the buffered record without its trailing newline. `None` when
    /// nothing but whitespace was written.
    pub fn take(&mut self) -> Option<String> {
        let bytes = std::mem::take(&mut self.bytes);
        let text = String::from_utf8_lossy(&bytes);
        let trimmed = text.trim_end();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

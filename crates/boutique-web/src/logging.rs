//! `tracing` subscriber writing to the browser console.

use std::io;
use std::sync::Once;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::console::{ConsoleMethod, RecordBuffer};

/// Writer for a single formatted record; the record is emitted on drop.
pub struct ConsoleWriter {
    method: ConsoleMethod,
    buffer: RecordBuffer,
}

impl ConsoleWriter {
    fn new(method: ConsoleMethod) -> Self {
        Self {
            method,
            buffer: RecordBuffer::default(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.push(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = self.buffer.take() else {
            return;
        };
        let value = JsValue::from_str(&line);
        match self.method {
            ConsoleMethod::Error => console::error_1(&value),
            ConsoleMethod::Warn => console::warn_1(&value),
            ConsoleMethod::Info => console::info_1(&value),
            ConsoleMethod::Debug => console::debug_1(&value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::Info)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::for_level(meta.level()))
    }
}

/// Install the console subscriber as the global default. Later calls, and
/// pages that already installed a subscriber, keep the existing one.
pub fn install() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let max_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(MakeConsoleWriter)
            .with_ansi(false)
            .without_time()
            .with_max_level(max_level)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

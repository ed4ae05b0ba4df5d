//! `tracing` output routed to the browser console.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and hands it to the matching console
/// method when dropped.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if line.is_empty() {
            return;
        }
        let message = JsValue::from_str(line);
        if self.level == Level::ERROR {
            web_sys::console::error_1(&message);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&message);
        } else {
            web_sys::console::log_1(&message);
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Install the console subscriber. Later calls are ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

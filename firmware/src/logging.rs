//! Logging into a shared-memory ring the host can read.
//!
//! The firmware logs through the `log` facade. Records end up in a [`LogSink`]; on the SoC that is
//! a [`MemLog`] over the `.log_shared_mem` region. Delivery is best effort: the ring silently
//! overwrites its oldest text, and anything logged before [`init`] is dropped.
//!
//! Levels follow `log`:
//! - TRACE: Fine-grained debugging information
//! - DEBUG: Register-level bring-up steps
//! - INFO: Informational messages
//! - WARN: Warning messages
//! - ERROR: Error messages

use core::fmt::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Destination for rendered log text.
pub trait LogSink {
    fn write_text(&mut self, text: &str);
}

/// Circular text buffer. The write position wraps to the start once the end is reached.
pub struct MemLog<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> MemLog<'a> {
    /// Takes over `buf` and clears it. The shared region is not loaded or zeroed at boot, so it
    /// may still hold text from a previous run.
    pub fn new(buf: &'a mut [u8]) -> Self {
        buf.fill(0);
        Self { buf, pos: 0 }
    }

    /// Offset the next byte will be written at.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..]
    }
}

impl LogSink for MemLog<'_> {
    fn write_text(&mut self, text: &str) {
        if self.buf.is_empty() {
            return;
        }
        for &b in text.as_bytes() {
            self.buf[self.pos] = b;
            self.pos += 1;
            if self.pos == self.buf.len() {
                self.pos = 0;
            }
        }
    }
}

struct SinkWriter<'s, S: ?Sized>(&'s mut S);

impl<S: LogSink + ?Sized> Write for SinkWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_text(s);
        Ok(())
    }
}

/// Render `record` as `[LEVEL] message\n` into `sink`.
pub fn render<S: LogSink + ?Sized>(sink: &mut S, record: &Record) {
    let _ = writeln!(SinkWriter(sink), "[{}] {}", record.level(), record.args());
}

static SINK: Mutex<Option<MemLog<'static>>> = Mutex::new(None);

/// `log::Log` front for the shared-memory ring.
pub struct SharedMemLogger;

impl Log for SharedMemLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        should_log(metadata.level())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A record raised while the ring is held (a panic mid-write) is dropped.
        if let Some(mut guard) = SINK.try_lock() {
            if let Some(sink) = guard.as_mut() {
                render(sink, record);
            }
        }
    }

    fn flush(&self) {}
}

pub static LOGGER: SharedMemLogger = SharedMemLogger;

/// Install `buf` as the log ring and register [`LOGGER`] with the facade.
pub fn init(buf: &'static mut [u8], level: LevelFilter) -> Result<(), SetLoggerError> {
    *SINK.lock() = Some(MemLog::new(buf));
    log::set_logger(&LOGGER)?;
    set_log_level(level);
    Ok(())
}

/// Get the current log level threshold.
pub fn get_log_level() -> LevelFilter {
    log::max_level()
}

/// Set the log level threshold. Messages below this level will be suppressed.
pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
}

/// Check if a message at the given level should be logged.
#[inline]
pub fn should_log(level: Level) -> bool {
    level <= log::max_level()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memlog_appends() {
        let mut buf = [0u8; 16];
        let mut log = MemLog::new(&mut buf);
        log.write_text("abc");
        log.write_text("de");
        assert_eq!(log.position(), 5);
        assert_eq!(&log.as_bytes()[..5], b"abcde");
        assert!(log.as_bytes()[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_memlog_clears_stale_text() {
        let mut buf = *b"old run text";
        let mut log = MemLog::new(&mut buf);
        assert!(log.as_bytes().iter().all(|&b| b == 0));
        log.write_text("new");
        assert_eq!(&log.as_bytes()[..4], b"new\0");
    }

    #[test]
    fn test_memlog_wraps() {
        let mut buf = [b'.'; 8];
        let mut log = MemLog::new(&mut buf);
        log.write_text("0123456");
        log.write_text("789");
        assert_eq!(log.position(), 2);
        assert_eq!(log.as_bytes(), b"89234567");
    }

    #[test]
    fn test_memlog_empty_buffer() {
        let mut buf = [0u8; 0];
        let mut log = MemLog::new(&mut buf);
        log.write_text("ignored");
        assert_eq!(log.position(), 0);
    }

    #[test]
    fn test_render_format() {
        let mut buf = [0u8; 64];
        let mut log = MemLog::new(&mut buf);
        render(
            &mut log,
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("reset done after {} polls", 3))
                .build(),
        );
        let text = "[DEBUG] reset done after 3 polls\n";
        assert_eq!(log.position(), text.len());
        assert_eq!(&log.as_bytes()[..text.len()], text.as_bytes());
    }

    #[test]
    fn test_render_into_custom_sink() {
        struct Lines(Vec<String>);
        impl LogSink for Lines {
            fn write_text(&mut self, text: &str) {
                self.0.push(text.to_string());
            }
        }

        let mut sink = Lines(Vec::new());
        render(
            &mut sink,
            &Record::builder().level(Level::Warn).args(format_args!("x")).build(),
        );
        assert_eq!(sink.0.concat(), "[WARN] x\n");
    }

    // The facade accepts one logger per process, so this is the only test that calls `init`.
    #[test]
    fn test_init_installs_ring_for_uart_bring_up() {
        use crate::board;
        use crate::mmio::sim::SimBus;
        use crate::uart::{regs, Uart, UartConfig};

        let ring: &'static mut [u8] = Box::leak(vec![b'?'; 64 * 1024].into_boxed_slice());
        init(ring, LevelFilter::Debug).unwrap();
        assert_eq!(get_log_level(), LevelFilter::Debug);
        assert!(should_log(Level::Debug));
        assert!(!should_log(Level::Trace));

        let mut bus = SimBus::new();
        bus.hold_low(board::UART1_BASE + regs::SYSS_REG, 1, 2);
        let config = UartConfig::new(board::UART1_CLOCK_HZ);
        Uart::new(&mut bus, board::UART1, config).init().unwrap();

        let text = {
            let guard = SINK.lock();
            let ring = guard.as_ref().unwrap();
            String::from_utf8_lossy(&ring.as_bytes()[..ring.position()]).into_owned()
        };

        // Other tests may log concurrently; only the relative order of these lines is fixed.
        let expected = [
            "[DEBUG] PAD configuration done\n",
            "[DEBUG] initiated reset\n",
            "[DEBUG] reset done\n",
            "[DEBUG] mode disabled\n",
            "[DEBUG] baud rate configured: divisor 26\n",
            "[DEBUG] protocol configured\n",
            "[DEBUG] divisor latch closed\n",
            "[DEBUG] switched to UART 16x mode\n",
            "[DEBUG] configuration done\n",
            "[INFO] UART at 0x02810000 configured: 115200 baud (actual 115384)\n",
        ];
        let mut rest = text.as_str();
        for line in expected {
            let at = rest.find(line).unwrap_or_else(|| panic!("missing {line:?} in {text:?}"));
            rest = &rest[at + line.len()..];
        }
    }
}

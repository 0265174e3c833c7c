//! Process-wide logger behind the `log` facade.
//!
//! Lines go to stderr and the most recent ones are kept in memory so they can
//! be inspected without a log file.

use chrono::{SecondsFormat, Utc};
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use std::sync::Mutex;

const BUFFER_CAPACITY: usize = 1000;

pub struct FlowGraphLogger {
    buffer: Mutex<VecDeque<String>>,
}

impl FlowGraphLogger {
    fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(BUFFER_CAPACITY)),
        }
    }
}

static LOGGER: OnceCell<FlowGraphLogger> = OnceCell::new();

impl log::Log for FlowGraphLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record);
        eprintln!("{}", line);
        if let Ok(mut buf) = self.buffer.lock() {
            buf.push_back(line);
            if buf.len() > BUFFER_CAPACITY {
                buf.pop_front();
            }
        }
    }

    fn flush(&self) {}
}

fn format_line(record: &Record) -> String {
    format!(
        "{} {:<5} {} - {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        record.level(),
        record.target(),
        record.args()
    )
}

/// Install the logger and set the maximum level.
///
/// Fails if another logger is already installed for this process.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(FlowGraphLogger::new);
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Most recent log lines, oldest first.
pub fn recent_logs() -> Vec<String> {
    LOGGER
        .get()
        .and_then(|l| l.buffer.lock().ok().map(|buf| buf.iter().cloned().collect()))
        .unwrap_or_default()
}

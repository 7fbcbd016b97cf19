use log::{LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

const LOG_CAPACITY: usize = 500;

pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

struct SharedLogger {
    level: LevelFilter,
    buffer: LogBuffer,
    echo_level: LevelFilter,
}

impl Log for SharedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("[{}] {}", record.level(), record.args());
        if record.level() <= self.echo_level {
            eprintln!("{}", line);
        }
        push_line(&self.buffer, line);
    }

    fn flush(&self) {}
}

static LOG_BUFFER: OnceLock<LogBuffer> = OnceLock::new();
static LOGGER: OnceLock<SharedLogger> = OnceLock::new();

/// Install the logger and return the ring of recent lines.
///
/// Level comes from `RUST_LOG`, or `debug` when set. Lines at or above
/// `echo_level` are also written to stderr. `FXBOARD_LOG_STDERR` (anything
/// but `0`) echoes everything, as does `debug` unless echo is off.
pub fn init(echo_level: LevelFilter, debug: bool) -> LogBuffer {
    let buffer = LOG_BUFFER
        .get_or_init(|| Arc::new(Mutex::new(VecDeque::with_capacity(LOG_CAPACITY))))
        .clone();

    let level = if debug {
        LevelFilter::Debug
    } else {
        match std::env::var("RUST_LOG") {
            Ok(level) => parse_level(&level),
            Err(_) => LevelFilter::Info,
        }
    };

    let forced = std::env::var("FXBOARD_LOG_STDERR")
        .map(|value| value != "0")
        .unwrap_or(false);
    let echo_level = if forced || (debug && echo_level != LevelFilter::Off) {
        LevelFilter::Trace
    } else {
        echo_level
    };

    let logger = SharedLogger {
        level,
        buffer: buffer.clone(),
        echo_level,
    };

    let logger_ref = LOGGER.get_or_init(|| logger);
    if log::set_logger(logger_ref).is_ok() {
        log::set_max_level(level);
    }

    buffer
}

pub fn snapshot(buffer: &LogBuffer) -> Vec<String> {
    match buffer.lock() {
        Ok(lines) => lines.iter().cloned().collect(),
        Err(_) => Vec::new(),
    }
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

fn push_line(buffer: &LogBuffer, line: String) {
    if let Ok(mut buffer) = buffer.lock() {
        if buffer.len() >= LOG_CAPACITY {
            buffer.pop_front();
        }
        buffer.push_back(line);
    }
}

//! Minimal stderr backend for the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error | Level::Warn => {
                eprintln!("{}: {}", record.level().to_string().to_lowercase(), record.args())
            }
            _ => eprintln!("{}", record.args()),
        }
    }

    fn flush(&self) {}
}

/// Warnings only, or everything down to debug with `verbose`.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // a logger installed earlier (e.g. by a test harness) stays in place
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

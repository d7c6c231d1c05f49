// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

/// Installs the stderr logger. Fails if another logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Prefix shown in front of a message of the given level.
pub fn level_icon(level: Level) -> &'static str {
  match level {
    Level::Error => "🔴", // Red Circle
    Level::Warn => "🟠",  // Orange Circle
    Level::Info => "🔵",  // Blue Circle
    Level::Debug => "⚪", // White/Gray Circle
    Level::Trace => "▫️", // Small dot
  }
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      // Format: "🔴  File not found"
      let _ = writeln!(std::io::stderr().lock(), "{}  {}", level_icon(record.level()), record.args());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_icons_per_level() {
    assert_eq!(level_icon(Level::Error), "🔴");
    assert_eq!(level_icon(Level::Warn), "🟠");
    assert_ne!(level_icon(Level::Info), level_icon(Level::Debug));
  }
}

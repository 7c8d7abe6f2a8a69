use ansi_term::Color::{Blue, Cyan, Green, Red, Yellow};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes log records to stderr so that stdout only carries reports.
pub struct TerminalLogger;

static LOGGER: TerminalLogger = TerminalLogger;

impl TerminalLogger {
    /// Installs the logger. Verbose runs show the analysis trace.
    pub fn install(verbose: bool) -> Result<(), log::SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
        Ok(())
    }
}

fn colored_level(level: Level) -> ansi_term::Colour {
    match level {
        Level::Error => Red,
        Level::Warn => Yellow,
        Level::Info => Green,
        Level::Debug => Blue,
        Level::Trace => Cyan,
    }
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[{:>8}][{:>5}]: {}",
                Yellow.paint(std::thread::current().name().unwrap_or("main")),
                colored_level(record.level()).paint(record.level().to_string()),
                record.args(),
            );
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_logger_installs_once() {
        TerminalLogger::install(true).context("Failed to install the logger").unwrap();
        assert_eq!(log::max_level(), LevelFilter::Debug);

        let err = TerminalLogger::install(false)
            .context("Failed to install the logger")
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to install the logger");
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}

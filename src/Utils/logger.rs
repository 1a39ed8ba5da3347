//! Logger setup shared by the examples and the binary: a terminal logger and an optional
//! log file, both at the same level.
use crate::error::CalculusError;
use chrono::Local;
use simplelog::*;
use std::fs::File;

/// level names accepted in configuration: "debug", "info", "warn", "error", "off"
pub fn parse_loglevel(loglevel: &str) -> Result<LevelFilter, CalculusError> {
    match loglevel {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        other => Err(CalculusError::Config(format!(
            "loglevel must be debug, info, warn, error or off, got {}",
            other
        ))),
    }
}

/// default log file name stamped with the current date and time
pub fn default_log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Initialises the global logger. `loglevel` defaults to "info"; with `log_file` given the
/// records are also written to that file. A logger that is already installed is kept.
pub fn init_logger(loglevel: Option<&str>, log_file: Option<&str>) -> Result<(), CalculusError> {
    let level = parse_loglevel(loglevel.unwrap_or("info"))?;
    if level == LevelFilter::Off {
        return Ok(());
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(name) = log_file {
        let file = File::create(name)
            .map_err(|e| CalculusError::Config(format!("cannot create log file {}: {}", name, e)))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    // a second initialisation is refused by `log`, the first logger stays active
    let _ = CombinedLogger::init(loggers);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loglevel() {
        assert_eq!(parse_loglevel("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_loglevel("off").unwrap(), LevelFilter::Off);
        assert!(matches!(
            parse_loglevel("verbose"),
            Err(CalculusError::Config(_))
        ));
    }

    #[test]
    fn test_default_log_file_name() {
        let name = default_log_file_name();
        assert!(name.starts_with("log_") && name.ends_with(".txt"));
    }

    #[test]
    fn test_init_logger_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calculus.log");
        init_logger(Some("warn"), path.to_str()).unwrap();
        assert!(path.exists());
        assert!(init_logger(Some("loud"), None).is_err());
    }
}

use chrono;
use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct LogConfig {
    level: LevelFilter,
    format_json: bool,
    file_path: Option<String>,
    color_enabled: bool,
}

struct BridgeLogger {
    config: Arc<Mutex<LogConfig>>,
    file_writer: Arc<Mutex<Option<File>>>,
}

impl BridgeLogger {
    fn new() -> Self {
        Self {
            config: Arc::new(Mutex::new(LogConfig {
                level: LevelFilter::Info,
                format_json: false,
                file_path: None,
                color_enabled: true,
            })),
            file_writer: Arc::new(Mutex::new(None)),
        }
    }

    fn reconfigure(
        &self,
        log_level: Option<&str>,
        log_format: Option<&str>,
        log_file: Option<&str>,
        color_enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let level = match log_level {
            Some(level_str) => match level_str.to_lowercase().as_str() {
                "trace" => LevelFilter::Trace,
                "debug" => LevelFilter::Debug,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                "off" => LevelFilter::Off,
                _ => LevelFilter::Info,
            },
            None => LevelFilter::Info,
        };

        let format_json = log_format == Some("json");
        let file_path = log_file.map(|s| s.to_string());

        match &file_path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                *self.file_writer.lock().unwrap() = Some(file);
            }
            None => {
                *self.file_writer.lock().unwrap() = None;
            }
        }

        *self.config.lock().unwrap() = LogConfig {
            level,
            format_json,
            file_path,
            color_enabled,
        };

        log::set_max_level(level);

        Ok(())
    }

    fn level_tag(level: Level, color_enabled: bool) -> String {
        if !color_enabled {
            return level.to_string();
        }
        match level {
            Level::Error => level.to_string().red().to_string(),
            Level::Warn => level.to_string().yellow().to_string(),
            Level::Info => level.to_string().green().to_string(),
            Level::Debug => level.to_string().blue().to_string(),
            Level::Trace => level.to_string().magenta().to_string(),
        }
    }

    fn format_console_message(&self, record: &Record, config: &LogConfig) -> String {
        if config.format_json {
            format!(
                r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}"}}"#,
                chrono::Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            )
        } else {
            format!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.target(),
                Self::level_tag(record.level(), config.color_enabled),
                record.args()
            )
        }
    }

    fn format_file_message(&self, record: &Record, config: &LogConfig) -> String {
        if config.format_json {
            format!(
                r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}"}}"#,
                chrono::Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                record.args()
            )
        } else {
            format!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.target(),
                record.level(),
                record.args()
            )
        }
    }
}

impl Log for BridgeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let config = self.config.lock().unwrap();
        metadata.level() <= config.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let config = self.config.lock().unwrap();

        // Diagnostics go to stderr so stdout stays clean for scan reports
        let console_message = self.format_console_message(record, &config);
        eprintln!("{}", console_message);

        if config.file_path.is_some() {
            if let Ok(mut file_opt) = self.file_writer.lock() {
                if let Some(ref mut file) = file_opt.as_mut() {
                    let file_message = self.format_file_message(record, &config);
                    let _ = writeln!(file, "{}", file_message);
                    let _ = file.flush();
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file_opt) = self.file_writer.lock() {
            if let Some(ref mut file) = file_opt.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

// Global static logger
static LOGGER: std::sync::OnceLock<BridgeLogger> = std::sync::OnceLock::new();

pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let logger = LOGGER.get_or_init(BridgeLogger::new);

    // Setting the global logger only works once
    log::set_logger(logger)?;

    logger.reconfigure(log_level, log_format, log_file, color_enabled)?;

    Ok(())
}

pub fn reconfigure_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(logger) = LOGGER.get() {
        logger.reconfigure(log_level, log_format, log_file, color_enabled)?;
        Ok(())
    } else {
        Err("Logger is not initialised. Call init_logging first.".into())
    }
}

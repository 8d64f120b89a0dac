use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

fn data_dir() -> PathBuf {
    match directories::ProjectDirs::from("com", "lumistream", "LumiStream") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from("."),
    }
}

pub fn log_path() -> PathBuf {
    let dir = data_dir();
    let _ = fs::create_dir_all(&dir);
    dir.join("lumistream.log")
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

pub fn format_line(level: Level, target: &str, message: &str) -> String {
    format!("[{}] {:<5} {}: {}", timestamp(), level, target, message)
}

/// Appends every record to the log file; warnings and errors also go to stderr.
pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<Option<fs::File>>,
}

impl FileLogger {
    pub fn new(level: LevelFilter, path: PathBuf) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path).ok();
        Self { level, file: Mutex::new(file) }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());
        if let Ok(mut guard) = self.file.lock() {
            if let Some(f) = guard.as_mut() {
                let _ = writeln!(f, "{}", line);
            }
        }
        if record.level() <= Level::Warn {
            eprintln!("{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(f) = guard.as_mut() {
                let _ = f.flush();
            }
        }
    }
}

/// `log_level` config value or `-v` count to a filter. Flags win over config.
pub fn level_filter(config_level: &str, verbose: u8) -> LevelFilter {
    match verbose {
        0 => config_level.parse().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(level: LevelFilter) -> Result<PathBuf, log::SetLoggerError> {
    init_at(level, log_path())
}

/// Installs the process-wide file logger; fails if one is already set.
pub fn init_at(level: LevelFilter, path: PathBuf) -> Result<PathBuf, log::SetLoggerError> {
    log::set_boxed_logger(Box::new(FileLogger::new(level, path.clone())))?;
    log::set_max_level(level);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_level() {
        assert_eq!(level_filter("warn", 0), LevelFilter::Warn);
        assert_eq!(level_filter("nonsense", 0), LevelFilter::Info);
        assert_eq!(level_filter("warn", 1), LevelFilter::Debug);
        assert_eq!(level_filter("warn", 3), LevelFilter::Trace);
    }

    #[test]
    fn writes_enabled_records_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        let logger = FileLogger::new(LevelFilter::Info, path.clone());
        logger.log(&Record::builder().level(Level::Info).target("page").args(format_args!("loaded")).build());
        logger.log(&Record::builder().level(Level::Debug).target("page").args(format_args!("hidden")).build());
        logger.flush();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("INFO  page: loaded"));
        assert!(!content.contains("hidden"));
    }

    #[test]
    fn installs_global_logger_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global.log");
        assert_eq!(init_at(LevelFilter::Info, path.clone()).unwrap(), path);
        assert_eq!(log::max_level(), LevelFilter::Info);
        log::info!(target: "startup", "logger ready");
        log::logger().flush();
        assert!(fs::read_to_string(&path).unwrap().contains("startup: logger ready"));
        assert!(init_at(LevelFilter::Debug, dir.path().join("second.log")).is_err());
    }
}

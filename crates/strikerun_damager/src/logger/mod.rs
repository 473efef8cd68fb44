//! Pluggable logger
//!
//! Хост-движок подменяет sink (console, engine console, файл) через
//! set_logger; gameplay-код зовёт свободные функции log/log_info/...
//! Timestamp добавляется здесь, sink печатает готовую строку.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static LOGGER: Lazy<Mutex<Option<Box<dyn LogSink>>>> = Lazy::new(|| Mutex::new(None));
static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

/// Уровень важности сообщения
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Приёмник готовых строк лога
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn set_logger(sink: Box<dyn LogSink>) {
    *LOGGER.lock().unwrap() = Some(sink);
}

pub fn set_logger_if_needed(sink: Box<dyn LogSink>) {
    let mut logger = LOGGER.lock().unwrap();
    if logger.is_none() {
        *logger = Some(sink);
    }
}

/// Сообщения ниже уровня отбрасываются
pub fn set_log_level(level: LogLevel) {
    *LOGGER_LEVEL.lock().unwrap() = level;
}

/// Console sink по умолчанию (не перетирает уже установленный)
pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleSink));
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    if level < *LOGGER_LEVEL.lock().unwrap() {
        return;
    }
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        logger.log(level, &format!("[{}] {}", timestamp, message));
    }
}

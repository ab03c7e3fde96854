use std::io;
use thiserror::Error;
use std::str::Utf8Error;
use iced;
use serde_json;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine path to preferences file")]
    NoConfigPath,

    #[error("Failed to acquire file lock on preferences file: {source}")]
    CanNotLock { source: io::Error },

    #[error("Failed to encode/decode preferences as utf-8: {source}")]
    Utf8Error { #[from] source: Utf8Error },

    #[error("Failed to read/write preferences file: {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to parse/build preferences file: {source}")]
    JsonError { #[from] source: serde_json::Error },
}

impl ConfigError {
    pub fn is_file_not_found_error(&self) -> bool {
        match self {
            ConfigError::IOError { source } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppRunError {
    #[error("Failed to start application (iced): {source}")]
    Iced { #[from] source: iced::Error },

    #[error("Failed to start application (config): {source}")]
    ConfigError { #[from] source: ConfigError },

    #[error("Failed to start application (logging): {source}")]
    LoggingError { #[from] source: LoggingError },
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to open LOG_FILE: {source}")]
    LogFile { #[from] source: io::Error },

    #[error("Failed to install logger: {source}")]
    SetLogger { #[from] source: log::SetLoggerError },
}

#[derive(Error, Debug)]
pub enum NfcError {
    #[error("NFC is not available on this host")]
    Unsupported,

    #[error("Failed to start scanning: {reason}")]
    ScanFailed { reason: String },

    #[error("No NFC tag present on the reader")]
    NoTag,

    #[error("Tag rejected the command with status {status:04X}")]
    ApduStatus { status: u16 },

    #[error("NDEF message of {length} bytes is too large for a tag")]
    PayloadTooLarge { length: usize },

    #[error("Writing to the tag took too long")]
    WriteTimeout,

    #[error("NFC worker task failed: {source}")]
    Join { #[from] source: JoinError },

    #[cfg(feature = "pcsc")]
    #[error("Error communicating with reader (pcsc): {source}")]
    Pcsc { #[from] source: pcsc::Error },
}

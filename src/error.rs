//! Error types for Sarathi

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Sarathi error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serial link could not be opened
    #[error("Cannot open serial port {port}: {source}")]
    TransportOpen {
        /// Port path that failed to open
        port: String,
        /// Underlying serial error
        source: serialport::Error,
    },

    /// StartOI / SafeMode sequence could not be sent
    #[error("Serial error during initialization: {0}")]
    TransportInit(String),

    /// A single command write failed (recoverable)
    #[error("Serial write error: {0}")]
    TransportWrite(String),

    /// Write attempted after the link was closed
    #[error("Transport already closed")]
    TransportClosed,

    /// Keyboard or stdin could not be read
    #[error("Input read error: {0}")]
    InputRead(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

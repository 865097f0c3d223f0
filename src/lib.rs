//! Sarathi - keyboard teleoperation for Open Interface robot vacuums
//!
//! Reads single key presses, encodes them as Open Interface commands and
//! streams them to the robot over a serial link.
//!
//! ## Modules
//!
//! - [`protocol`]: pure opcode encoding (Start, Safe, Drive, Clean, Dock)
//! - [`transport`]: serial link and a recording mock
//! - [`input`]: raw terminal, piped stdin and scripted key sources
//! - [`teleop`]: key bindings and the control loop

pub mod config;
pub mod error;
pub mod input;
pub mod protocol;
pub mod teleop;
pub mod transport;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use teleop::{Controller, SessionSummary};

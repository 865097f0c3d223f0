//! Configuration for Sarathi
//!
//! Loads configuration from a TOML file. Every field has a default, so a
//! partial file (or no file at all) yields a working setup for a robot on
//! `/dev/ttyUSB0` at 115200 baud.

use crate::error::{Error, Result};
use crate::protocol::MAX_VELOCITY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub teleop: TeleopConfig,
}

/// Serial link to the robot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0")
    #[serde(default = "default_port")]
    pub port: String,

    /// Link speed in baud
    #[serde(default = "default_baud", alias = "baud_rate")]
    pub baud: u32,

    /// Read timeout handed to the serial driver (milliseconds)
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Pause after opening the port so the robot can wake up (milliseconds)
    #[serde(default = "default_wake_delay_ms")]
    pub wake_delay_ms: u64,
}

/// Control loop timing and speeds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeleopConfig {
    /// Pacing interval after every drive or stop command (milliseconds)
    #[serde(default = "default_command_delay_ms")]
    pub command_delay_ms: u64,

    /// Pause after each mode opcode during startup (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Straight-line speed for forward/backward keys (mm/s)
    #[serde(default = "default_drive_speed")]
    pub drive_speed: i16,

    /// Wheel speed for in-place pivots (mm/s)
    #[serde(default = "default_pivot_speed")]
    pub pivot_speed: i16,
}

fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}
fn default_baud() -> u32 {
    115200
}
fn default_read_timeout_ms() -> u64 {
    1000
}
fn default_wake_delay_ms() -> u64 {
    2000
}
fn default_command_delay_ms() -> u64 {
    150
}
fn default_settle_delay_ms() -> u64 {
    100
}
fn default_drive_speed() -> i16 {
    200
}
fn default_pivot_speed() -> i16 {
    100
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud: default_baud(),
            read_timeout_ms: default_read_timeout_ms(),
            wake_delay_ms: default_wake_delay_ms(),
        }
    }
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            command_delay_ms: default_command_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            drive_speed: default_drive_speed(),
            pivot_speed: default_pivot_speed(),
        }
    }
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn wake_delay(&self) -> Duration {
        Duration::from_millis(self.wake_delay_ms)
    }
}

impl TeleopConfig {
    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Timing profile with every delay set to zero
    pub fn without_delays() -> Self {
        Self {
            command_delay_ms: 0,
            settle_delay_ms: 0,
            ..Self::default()
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use sarathi::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("sarathi.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the robot cannot act on
    pub fn validate(&self) -> Result<()> {
        if self.serial.port.trim().is_empty() {
            return Err(Error::Config("serial.port must not be empty".to_string()));
        }
        if self.serial.baud == 0 {
            return Err(Error::Config("serial.baud must be non-zero".to_string()));
        }
        for (name, speed) in [
            ("teleop.drive_speed", self.teleop.drive_speed),
            ("teleop.pivot_speed", self.teleop.pivot_speed),
        ] {
            if speed <= 0 || speed > MAX_VELOCITY {
                return Err(Error::Config(format!(
                    "{} must be in 1..={} mm/s, got {}",
                    name, MAX_VELOCITY, speed
                )));
            }
        }
        Ok(())
    }
}

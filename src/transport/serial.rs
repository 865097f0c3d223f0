//! Serial transport implementation

use super::Transport;
use crate::config::SerialConfig;
use crate::error::{Error, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Write;

/// Serial transport for the robot's mini-DIN port
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    path: String,
}

impl SerialTransport {
    /// Open a serial port
    ///
    /// # Arguments
    /// * `config` - Port path, baud rate (e.g., 115200) and read timeout
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout())
            .open()
            .map_err(|source| Error::TransportOpen {
                port: config.port.clone(),
                source,
            })?;

        log::info!("Opened serial port: {} at {} baud", config.port, config.baud);

        Ok(SerialTransport {
            port: Some(port),
            path: config.port.clone(),
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(Error::TransportClosed)
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.port_mut()?
            .write_all(data)
            .map_err(|e| Error::TransportWrite(e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.port_mut()?.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            log::info!("Closed serial port: {}", self.path);
        }
        Ok(())
    }
}

//! Transport layer for the serial link

use crate::error::Result;
use crate::protocol::Packet;

pub mod mock;
mod serial;

pub use mock::MockTransport;
pub use serial::SerialTransport;

/// Byte sink to the robot
///
/// Implementations are owned by exactly one control loop; no method needs to
/// be safe for concurrent callers.
pub trait Transport: Send {
    /// Write all of `data`
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Flush any pending writes (blocking until complete)
    fn flush(&mut self) -> Result<()>;

    /// Release the link without flushing. Writes after this return
    /// `Error::TransportClosed`.
    fn close(&mut self) -> Result<()>;

    /// Write one encoded command
    fn send(&mut self, packet: &Packet) -> Result<()> {
        log::debug!("TX {:02X?}", packet.as_bytes());
        self.write(packet.as_bytes())
    }
}

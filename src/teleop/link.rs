//! Owned robot link with guaranteed stop-and-close

use crate::error::{Error, Result};
use crate::protocol::{MotionCommand, Packet};
use crate::transport::Transport;

/// Exclusive owner of the transport
///
/// Releasing the link (explicitly via [`RobotLink::release`] or by drop)
/// sends a best-effort stop if motion was armed, flushes it out, then closes
/// the transport.
/// The transport is taken out on first release, so this happens exactly once
/// whichever path gets there first.
pub(crate) struct RobotLink<T: Transport> {
    transport: Option<T>,
    /// Set once Safe mode was requested; before that a Drive is meaningless
    motion_armed: bool,
}

impl<T: Transport> RobotLink<T> {
    pub(crate) fn new(transport: T) -> Self {
        Self {
            transport: Some(transport),
            motion_armed: false,
        }
    }

    pub(crate) fn arm(&mut self) {
        self.motion_armed = true;
    }

    pub(crate) fn send(&mut self, packet: &Packet) -> Result<()> {
        self.transport
            .as_mut()
            .ok_or(Error::TransportClosed)?
            .send(packet)
    }

    /// Stop the robot (if armed), flush and close the transport
    pub(crate) fn release(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };

        if self.motion_armed {
            match transport.send(&MotionCommand::STOP.encode()) {
                Ok(()) => log::debug!("Final stop sent"),
                Err(e) => log::warn!("Final stop failed: {}", e),
            }
        }
        if let Err(e) = transport.flush() {
            log::warn!("Error flushing transport: {}", e);
        }
        if let Err(e) = transport.close() {
            log::warn!("Error closing transport: {}", e);
        }
    }
}

impl<T: Transport> Drop for RobotLink<T> {
    fn drop(&mut self) {
        self.release();
    }
}

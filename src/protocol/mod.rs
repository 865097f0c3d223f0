//! Open Interface command encoding
//!
//! Only the opcode subset needed for manual driving is covered: mode
//! transitions (Start, Safe), the Drive command, and the Clean and Dock
//! buttons. Encoding is pure; nothing here touches the serial link.

pub mod constants;
pub mod packet;

pub use constants::*;
pub use packet::{ModeCommand, MotionCommand, Packet, encode_drive, encode_mode};

//! Fixed-size packet structures for Open Interface commands
//!
//! Every command fits in a 5-byte stack buffer, so encoding never allocates.
//!
//! # Drive layout
//!
//! ```text
//! [137] [velocity hi] [velocity lo] [radius hi] [radius lo]
//! ```
//!
//! Both words are 16-bit two's complement, big endian. Velocity is clamped to
//! ±500 mm/s and radius to ±2000 mm, except the straight sentinel 0x8000 which
//! is sent as-is.

use super::constants::*;
use std::fmt;

/// Largest packet in the supported subset (Drive)
const MAX_PACKET_SIZE: usize = DRIVE_PACKET_SIZE;

/// Encoded command ready for the wire
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    data: [u8; MAX_PACKET_SIZE],
    len: usize,
}

impl Packet {
    /// Get packet bytes for sending
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Leading opcode byte
    #[inline]
    pub fn opcode(&self) -> u8 {
        self.data[0]
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet({:02X?})", self.as_bytes())
    }
}

/// Parameterless mode and button opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand {
    /// Open the interface (Passive mode)
    StartOI,
    /// Enter Safe mode so drive commands are accepted
    SafeMode,
    /// Start the default cleaning cycle
    Clean,
    /// Seek the charging dock
    Dock,
}

impl ModeCommand {
    pub fn opcode(self) -> u8 {
        match self {
            Self::StartOI => OPCODE_START,
            Self::SafeMode => OPCODE_SAFE,
            Self::Clean => OPCODE_CLEAN,
            Self::Dock => OPCODE_DOCK,
        }
    }
}

/// Drive intent before clamping
///
/// Fields are plain integers so out-of-range requests are representable; the
/// encoder clamps them. `radius == RADIUS_STRAIGHT` means no turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionCommand {
    /// Wheel velocity in mm/s (positive = forward)
    pub velocity: i32,
    /// Turn radius in mm (positive = left), or the straight sentinel
    pub radius: i32,
}

impl MotionCommand {
    /// Zero velocity, zero radius
    pub const STOP: Self = Self {
        velocity: 0,
        radius: 0,
    };

    pub const fn new(velocity: i32, radius: i32) -> Self {
        Self { velocity, radius }
    }

    /// Straight line at `velocity` (negative drives backward)
    pub const fn straight(velocity: i32) -> Self {
        Self::new(velocity, RADIUS_STRAIGHT)
    }

    /// Counter-clockwise spin in place
    pub const fn pivot_left(speed: i32) -> Self {
        Self::new(speed, RADIUS_PIVOT_LEFT)
    }

    /// Clockwise spin in place
    pub const fn pivot_right(speed: i32) -> Self {
        Self::new(speed, RADIUS_PIVOT_RIGHT)
    }

    /// Encode to a Drive packet
    pub fn encode(&self) -> Packet {
        encode_drive(self.velocity, self.radius)
    }
}

/// Encode a Drive (137) command
///
/// Never fails: out-of-range values are clamped, not rejected.
pub fn encode_drive(velocity: i32, radius: i32) -> Packet {
    let velocity = clamp_i16(velocity, MAX_VELOCITY);
    let radius_word = if radius == RADIUS_STRAIGHT {
        RADIUS_STRAIGHT as u16
    } else {
        clamp_i16(radius, MAX_RADIUS) as u16
    };

    let mut data = [0u8; MAX_PACKET_SIZE];
    data[0] = OPCODE_DRIVE;
    data[1..3].copy_from_slice(&velocity.to_be_bytes());
    data[3..5].copy_from_slice(&radius_word.to_be_bytes());
    Packet {
        data,
        len: DRIVE_PACKET_SIZE,
    }
}

/// Encode a single-byte mode opcode
pub fn encode_mode(kind: ModeCommand) -> Packet {
    let mut data = [0u8; MAX_PACKET_SIZE];
    data[0] = kind.opcode();
    Packet {
        data,
        len: MODE_PACKET_SIZE,
    }
}

#[inline]
fn clamp_i16(value: i32, limit: i16) -> i16 {
    value.clamp(-(limit as i32), limit as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn velocity_of(pkt: &Packet) -> i16 {
        i16::from_be_bytes([pkt.as_bytes()[1], pkt.as_bytes()[2]])
    }

    fn radius_of(pkt: &Packet) -> i16 {
        i16::from_be_bytes([pkt.as_bytes()[3], pkt.as_bytes()[4]])
    }

    #[test]
    fn test_drive_packet_layout() {
        let pkt = encode_drive(200, 500);
        // [89] [00 C8] [01 F4]
        assert_eq!(pkt.as_bytes(), &[137, 0x00, 0xC8, 0x01, 0xF4]);
        assert_eq!(pkt.opcode(), OPCODE_DRIVE);
    }

    #[test]
    fn test_negative_values_twos_complement() {
        let pkt = encode_drive(-200, -1);
        // -200 = 65336 = 0xFF38, -1 = 0xFFFF
        assert_eq!(pkt.as_bytes(), &[137, 0xFF, 0x38, 0xFF, 0xFF]);
    }

    #[test]
    fn test_mode_opcodes() {
        assert_eq!(encode_mode(ModeCommand::StartOI).as_bytes(), &[128]);
        assert_eq!(encode_mode(ModeCommand::SafeMode).as_bytes(), &[131]);
        assert_eq!(encode_mode(ModeCommand::Clean).as_bytes(), &[135]);
        assert_eq!(encode_mode(ModeCommand::Dock).as_bytes(), &[143]);
    }

    #[test]
    fn test_velocity_clamping() {
        assert_eq!(velocity_of(&encode_drive(999, 0)), 500);
        assert_eq!(velocity_of(&encode_drive(-999, 0)), -500);
        assert_eq!(velocity_of(&encode_drive(500, 0)), 500);
        assert_eq!(velocity_of(&encode_drive(i32::MIN, 0)), -500);
    }

    #[test]
    fn test_radius_clamping() {
        assert_eq!(radius_of(&encode_drive(0, 5000)), 2000);
        assert_eq!(radius_of(&encode_drive(0, -5000)), -2000);
        assert_eq!(radius_of(&encode_drive(0, 2000)), 2000);
        // Just past the sentinel is an ordinary out-of-range value
        assert_eq!(radius_of(&encode_drive(0, 0x8001)), 2000);
    }

    #[test]
    fn test_straight_sentinel_bypasses_clamp() {
        let pkt = encode_drive(200, RADIUS_STRAIGHT);
        assert_eq!(&pkt.as_bytes()[3..5], &[0x80, 0x00]);

        let pkt = MotionCommand::straight(-200).encode();
        assert_eq!(pkt.as_bytes(), &[137, 0xFF, 0x38, 0x80, 0x00]);
    }

    #[test]
    fn test_velocity_round_trip() {
        for v in -500..=500 {
            let pkt = encode_drive(v, 0);
            assert_eq!(velocity_of(&pkt) as i32, v, "velocity {}", v);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        for (v, r) in [(0, 0), (100, 1), (100, -1), (-200, RADIUS_STRAIGHT), (731, -9000)] {
            assert_eq!(encode_drive(v, r), encode_drive(v, r));
        }
    }

    #[test]
    fn test_motion_helpers() {
        assert_eq!(MotionCommand::STOP.encode().as_bytes(), &[137, 0, 0, 0, 0]);
        assert_eq!(
            MotionCommand::pivot_left(100).encode().as_bytes(),
            &[137, 0x00, 0x64, 0x00, 0x01]
        );
        assert_eq!(
            MotionCommand::pivot_right(100).encode().as_bytes(),
            &[137, 0x00, 0x64, 0xFF, 0xFF]
        );
    }
}

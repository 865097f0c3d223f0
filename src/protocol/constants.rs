//! Open Interface opcodes and limits

// Mode opcodes
pub const OPCODE_START: u8 = 128; // Start OI, robot enters Passive mode
pub const OPCODE_SAFE: u8 = 131; // Safe mode, cliff/wheel-drop sensors stay armed
pub const OPCODE_CLEAN: u8 = 135; // Default cleaning cycle
pub const OPCODE_DOCK: u8 = 143; // Seek dock

// Actuator opcodes
pub const OPCODE_DRIVE: u8 = 137; // velocity(i16 BE) + radius(i16 BE)

// Drive limits
pub const MAX_VELOCITY: i16 = 500; // mm/s
pub const MAX_RADIUS: i16 = 2000; // mm

/// Radius value meaning "drive straight" (emitted as 0x80 0x00)
pub const RADIUS_STRAIGHT: i32 = 0x8000;

/// Radius for an in-place counter-clockwise pivot
pub const RADIUS_PIVOT_LEFT: i32 = 1;
/// Radius for an in-place clockwise pivot
pub const RADIUS_PIVOT_RIGHT: i32 = -1;

// Packet sizes
pub const DRIVE_PACKET_SIZE: usize = 5; // opcode(1) + velocity(2) + radius(2)
pub const MODE_PACKET_SIZE: usize = 1;

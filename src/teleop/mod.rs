//! Keyboard teleoperation
//!
//! - [`keymap`]: key to action table
//! - [`controller::Controller`]: owns the robot link and runs the read-dispatch loop

pub mod controller;
pub mod keymap;
mod link;

pub use controller::{Controller, ExitReason, Flow, SessionSummary};
pub use keymap::{Action, KeyBinding, Keymap};

//! Key bindings
//!
//! | Key   | Action                         |
//! |-------|--------------------------------|
//! | W     | forward, straight              |
//! | S     | backward, straight             |
//! | A / D | brake, then pivot left / right |
//! | Space | stop                           |
//! | C     | clean                          |
//! | H     | dock                           |
//! | Esc   | emergency stop                 |
//! | Q     | quit                           |
//!
//! Letters match case-insensitively. Escape is checked before case folding.

use crate::config::TeleopConfig;
use crate::input::ESCAPE;
use crate::protocol::MotionCommand;

/// What a key press asks the robot to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drive with the given velocity and radius
    Drive(MotionCommand),
    /// Drive(0, 0)
    Stop,
    /// Clean button
    Clean,
    /// Dock button
    Dock,
    /// Stop and report an emergency; the session continues
    EmergencyStop,
    /// Leave the control loop
    Quit,
}

/// A single key and its action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: char,
    pub action: Action,
    /// Status line reported after the action runs
    pub label: &'static str,
}

impl KeyBinding {
    /// Key name for the help banner
    pub fn key_name(&self) -> String {
        match self.key {
            ' ' => "Space".to_string(),
            ESCAPE => "ESC".to_string(),
            c => c.to_ascii_uppercase().to_string(),
        }
    }
}

/// Lookup table from input symbol to action
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    /// Standard layout with the given straight and pivot speeds (mm/s)
    pub fn new(drive_speed: i16, pivot_speed: i16) -> Self {
        let drive = drive_speed as i32;
        let pivot = pivot_speed as i32;
        let bindings = vec![
            KeyBinding {
                key: 'w',
                action: Action::Drive(MotionCommand::straight(drive)),
                label: "Forward",
            },
            KeyBinding {
                key: 's',
                action: Action::Drive(MotionCommand::straight(-drive)),
                label: "Backward",
            },
            KeyBinding {
                key: 'a',
                action: Action::Drive(MotionCommand::pivot_left(pivot)),
                label: "Turn Left",
            },
            KeyBinding {
                key: 'd',
                action: Action::Drive(MotionCommand::pivot_right(pivot)),
                label: "Turn Right",
            },
            KeyBinding {
                key: ' ',
                action: Action::Stop,
                label: "Stop",
            },
            KeyBinding {
                key: 'c',
                action: Action::Clean,
                label: "Clean mode",
            },
            KeyBinding {
                key: 'h',
                action: Action::Dock,
                label: "Docking",
            },
            KeyBinding {
                key: ESCAPE,
                action: Action::EmergencyStop,
                label: "EMERGENCY STOP!",
            },
            KeyBinding {
                key: 'q',
                action: Action::Quit,
                label: "Exiting...",
            },
        ];
        Self { bindings }
    }

    pub fn from_config(config: &TeleopConfig) -> Self {
        Self::new(config.drive_speed, config.pivot_speed)
    }

    /// Find the binding for an input symbol, if any
    pub fn lookup(&self, symbol: char) -> Option<&KeyBinding> {
        let key = if symbol == ESCAPE {
            symbol
        } else {
            symbol.to_ascii_lowercase()
        };
        self.bindings.iter().find(|b| b.key == key)
    }

    /// Multi-line key reference shown once the robot is ready
    pub fn help_text(&self) -> String {
        let entry = |key: char| {
            self.bindings
                .iter()
                .find(|b| b.key == key)
                .map(|b| format!("{} = {}", b.key_name(), describe(b.action)))
                .unwrap_or_default()
        };
        let motion: Vec<String> = ['w', 's', 'a', 'd'].into_iter().map(entry).collect();
        let other: Vec<String> = [' ', 'c', 'h', ESCAPE, 'q'].into_iter().map(entry).collect();
        format!("{}\n{}", motion.join(" | "), other.join(" | "))
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&TeleopConfig::default())
    }
}

fn describe(action: Action) -> &'static str {
    match action {
        Action::Drive(m) if m.radius == crate::protocol::RADIUS_STRAIGHT => {
            if m.velocity >= 0 {
                "Forward"
            } else {
                "Backward"
            }
        }
        Action::Drive(m) if m.radius > 0 => "Turn Left",
        Action::Drive(_) => "Turn Right",
        Action::Stop => "Stop",
        Action::Clean => "Clean",
        Action::Dock => "Dock",
        Action::EmergencyStop => "Emergency Stop",
        Action::Quit => "Quit",
    }
}

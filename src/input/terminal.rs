//! Raw-mode terminal keyboard

use super::{ESCAPE, InputEvent, KeySource, POLL_INTERVAL};
use crate::error::{Error, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Interactive keyboard on the controlling terminal
///
/// Raw mode (no echo, no line buffering) is held only for the duration of a
/// single `read_key` call, so log output between reads renders normally.
pub struct TerminalKeys {
    shutdown: Arc<AtomicBool>,
}

impl TerminalKeys {
    pub fn new(shutdown: Arc<AtomicBool>) -> Self {
        Self { shutdown }
    }
}

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> Result<InputEvent> {
        let _raw = RawModeGuard::enter()?;

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(InputEvent::Interrupt);
            }
            if !event::poll(POLL_INTERVAL).map_err(input_error)? {
                continue;
            }
            if let Event::Key(key) = event::read().map_err(input_error)?
                && let Some(input) = translate_key(key)
            {
                return Ok(input);
            }
        }
    }
}

/// Map a crossterm key event to an input event
///
/// Ctrl+C does not raise SIGINT while the terminal is raw, so it is reported
/// as an interrupt here. Ctrl+D ends input. Other Ctrl/Alt chords are not
/// plain symbols and are dropped.
pub(crate) fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c' | 'C')) => Some(InputEvent::Interrupt),
        (KeyModifiers::CONTROL, KeyCode::Char('d' | 'D')) => Some(InputEvent::Closed),
        (_, KeyCode::Esc) => Some(InputEvent::Key(ESCAPE)),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => Some(InputEvent::Key(c)),
        _ => None,
    }
}

fn input_error(e: std::io::Error) -> Error {
    Error::InputRead(e.to_string())
}

/// Restores cooked mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().map_err(input_error)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

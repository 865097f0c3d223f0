//! Keyboard input sources
//!
//! The control loop pulls one [`InputEvent`] at a time from a [`KeySource`].
//! Sources own any terminal state they change and restore it before
//! returning, including on error.

mod signals;
mod stream;
mod terminal;

pub use signals::watch_signals;
pub use stream::StreamKeys;
pub use terminal::TerminalKeys;

use crate::error::Result;
use std::collections::VecDeque;
use std::time::Duration;

/// Escape key as delivered by a raw terminal
pub const ESCAPE: char = '\x1b';

/// How often blocking sources re-check the shutdown flag
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One unit of keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A single symbol (letter, space, escape, ...)
    Key(char),
    /// Ctrl+C, SIGINT or SIGTERM
    Interrupt,
    /// The input stream ended
    Closed,
}

/// Blocking source of key presses
pub trait KeySource {
    /// Block until the next event is available
    fn read_key(&mut self) -> Result<InputEvent>;
}

impl<K: KeySource + ?Sized> KeySource for Box<K> {
    fn read_key(&mut self) -> Result<InputEvent> {
        (**self).read_key()
    }
}

/// Pre-recorded input for tests and dry runs
///
/// Reports [`InputEvent::Closed`] once the script is exhausted.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    events: VecDeque<InputEvent>,
    reads: usize,
}

impl ScriptedKeys {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            reads: 0,
        }
    }

    /// One key event per character
    pub fn from_keys(keys: &str) -> Self {
        Self::new(keys.chars().map(InputEvent::Key))
    }

    /// Number of `read_key` calls so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Events not yet consumed
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<InputEvent> {
        self.reads += 1;
        Ok(self.events.pop_front().unwrap_or(InputEvent::Closed))
    }
}

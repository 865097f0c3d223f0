//! Teleoperation control loop
//!
//! # Lifecycle
//!
//! ```text
//!  open ──▶ wake delay ──▶ StartOI ──▶ settle ──▶ Safe ──▶ settle ──▶ Running
//!                             │                     │                   │
//!                             └── write fails ──────┴──▶ close          │
//!                                                                       ▼
//!              q / Ctrl+C / SIGTERM / end of input / read error / panic
//!                                                                       │
//!                                                       Stop ──▶ close ◀┘
//! ```
//!
//! ## Safety Properties
//!
//! - Every drive or stop is followed by the pacing delay before the next read
//! - A pivot is always preceded by a stop
//! - Leaving `Running` by any path sends one final stop and closes the link once
//! - A failed write is reported and the session continues

use super::keymap::{Action, Keymap};
use super::link::RobotLink;
use crate::config::TeleopConfig;
use crate::error::{Error, Result};
use crate::input::{InputEvent, KeySource};
use crate::protocol::{
    ModeCommand, MotionCommand, RADIUS_PIVOT_LEFT, RADIUS_PIVOT_RIGHT, encode_mode,
};
use crate::transport::Transport;
use std::fmt;
use std::thread;
use std::time::Duration;

/// Whether the loop keeps reading after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Why the session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Quit key
    Quit,
    /// Ctrl+C or termination signal
    Interrupted,
    /// Input stream reached its end
    InputClosed,
    /// Input stream failed
    InputFailed(String),
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quit => write!(f, "quit"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::InputClosed => write!(f, "input closed"),
            Self::InputFailed(e) => write!(f, "input failed: {}", e),
        }
    }
}

/// Outcome of a completed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub reason: ExitReason,
    /// Keys that mapped to an action
    pub keys_handled: usize,
    /// Writes that failed during the session (final stop excluded)
    pub failed_writes: usize,
}

impl SessionSummary {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        match self.reason {
            ExitReason::InputFailed(_) => 1,
            _ => 0,
        }
    }
}

/// Keyboard-driven controller owning the robot link
pub struct Controller<T: Transport> {
    link: RobotLink<T>,
    keymap: Keymap,
    command_delay: Duration,
    keys_handled: usize,
    failed_writes: usize,
}

impl<T: Transport> Controller<T> {
    /// Bring the robot into Safe mode and take ownership of the link
    ///
    /// Waits `wake_delay`, then sends StartOI and SafeMode, each followed by
    /// the settle delay. The robot does not acknowledge either opcode; a
    /// successful write is all that is checked. If a write fails the
    /// transport is closed and `Error::TransportInit` is returned.
    pub fn start(transport: T, config: &TeleopConfig, wake_delay: Duration) -> Result<Self> {
        let mut link = RobotLink::new(transport);

        pause(wake_delay);
        for mode in [ModeCommand::StartOI, ModeCommand::SafeMode] {
            link.send(&encode_mode(mode))
                .map_err(|e| Error::TransportInit(format!("{:?}: {}", mode, e)))?;
            pause(config.settle_delay());
        }
        link.arm();
        log::info!("Robot in Safe mode");

        Ok(Self {
            link,
            keymap: Keymap::from_config(config),
            command_delay: config.command_delay(),
            keys_handled: 0,
            failed_writes: 0,
        })
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Read and dispatch keys until the session ends, then stop and close
    pub fn run<K: KeySource>(mut self, keys: &mut K) -> SessionSummary {
        let reason = loop {
            match keys.read_key() {
                Ok(InputEvent::Key(symbol)) => {
                    if self.handle_key(symbol) == Flow::Exit {
                        break ExitReason::Quit;
                    }
                }
                Ok(InputEvent::Interrupt) => break ExitReason::Interrupted,
                Ok(InputEvent::Closed) => {
                    log::info!("Input closed");
                    break ExitReason::InputClosed;
                }
                Err(e) => {
                    log::error!("{}", e);
                    break ExitReason::InputFailed(e.to_string());
                }
            }
        };

        self.shutdown(reason)
    }

    /// Dispatch a single input symbol
    pub fn handle_key(&mut self, symbol: char) -> Flow {
        let Some(binding) = self.keymap.lookup(symbol).copied() else {
            log::trace!("Ignoring key {:?}", symbol);
            return Flow::Continue;
        };

        self.keys_handled += 1;
        let flow = self.dispatch(binding.action);
        match binding.action {
            Action::EmergencyStop => log::warn!("{}", binding.label),
            _ => log::info!("{}", binding.label),
        }
        flow
    }

    /// Execute one action against the robot
    pub fn dispatch(&mut self, action: Action) -> Flow {
        match action {
            Action::Drive(motion) => {
                if is_pivot(&motion) {
                    self.drive(MotionCommand::STOP);
                }
                self.drive(motion);
            }
            Action::Stop | Action::EmergencyStop => self.drive(MotionCommand::STOP),
            Action::Clean => self.mode(ModeCommand::Clean),
            Action::Dock => self.mode(ModeCommand::Dock),
            // Final stop comes from the exit sequence
            Action::Quit => return Flow::Exit,
        }
        Flow::Continue
    }

    fn drive(&mut self, motion: MotionCommand) {
        if let Err(e) = self.link.send(&motion.encode()) {
            self.report_write_failure(e);
        }
        pause(self.command_delay);
    }

    fn mode(&mut self, mode: ModeCommand) {
        if let Err(e) = self.link.send(&encode_mode(mode)) {
            self.report_write_failure(e);
        }
    }

    fn report_write_failure(&mut self, e: Error) {
        self.failed_writes += 1;
        log::warn!("{}", e);
    }

    fn shutdown(mut self, reason: ExitReason) -> SessionSummary {
        self.link.release();
        match reason {
            ExitReason::Interrupted => log::info!("Interrupted. Robot stopped."),
            _ => log::info!("Robot stopped, link closed"),
        }
        SessionSummary {
            reason,
            keys_handled: self.keys_handled,
            failed_writes: self.failed_writes,
        }
    }
}

fn is_pivot(motion: &MotionCommand) -> bool {
    motion.velocity != 0 && matches!(motion.radius, RADIUS_PIVOT_LEFT | RADIUS_PIVOT_RIGHT)
}

#[inline]
fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ESCAPE, ScriptedKeys};
    use crate::protocol::{RADIUS_STRAIGHT, encode_drive};
    use crate::transport::MockTransport;

    const STOP: [u8; 5] = [137, 0, 0, 0, 0];

    fn drive(v: i32, r: i32) -> Vec<u8> {
        encode_drive(v, r).as_bytes().to_vec()
    }

    fn started() -> (MockTransport, Controller<MockTransport>) {
        let mock = MockTransport::new();
        let controller =
            Controller::start(mock.clone(), &TeleopConfig::without_delays(), Duration::ZERO)
                .unwrap();
        mock.clear_written();
        (mock, controller)
    }

    #[test]
    fn test_startup_sends_start_then_safe() {
        let mock = MockTransport::new();
        let _controller =
            Controller::start(mock.clone(), &TeleopConfig::without_delays(), Duration::ZERO)
                .unwrap();
        assert_eq!(mock.frames(), vec![vec![128], vec![131]]);
        assert_eq!(mock.close_count(), 0);
    }

    #[test]
    fn test_startup_failure_closes_without_stop() {
        let mock = MockTransport::new();
        mock.fail_all_writes(true);

        let result =
            Controller::start(mock.clone(), &TeleopConfig::without_delays(), Duration::ZERO);

        assert!(matches!(result, Err(Error::TransportInit(_))));
        assert!(mock.frames().is_empty());
        assert_eq!(mock.close_count(), 1);
    }

    /// Lets the first write through, fails every later one
    struct FailAfterFirst {
        inner: MockTransport,
        writes: usize,
    }

    impl Transport for FailAfterFirst {
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.writes += 1;
            if self.writes > 1 {
                return Err(Error::TransportWrite("no response".to_string()));
            }
            self.inner.write(data)
        }

        fn flush(&mut self) -> Result<()> {
            self.inner.flush()
        }

        fn close(&mut self) -> Result<()> {
            self.inner.close()
        }
    }

    #[test]
    fn test_safe_mode_failure_aborts_startup() {
        let mock = MockTransport::new();
        let transport = FailAfterFirst {
            inner: mock.clone(),
            writes: 0,
        };

        let result = Controller::start(transport, &TeleopConfig::without_delays(), Duration::ZERO);

        assert!(matches!(result, Err(Error::TransportInit(_))));
        assert_eq!(mock.frames(), vec![vec![128]]);
        assert_eq!(mock.close_count(), 1);
    }

    #[test]
    fn test_each_key_dispatch() {
        let cases: [(char, Vec<Vec<u8>>); 8] = [
            ('w', vec![drive(200, RADIUS_STRAIGHT)]),
            ('s', vec![drive(-200, RADIUS_STRAIGHT)]),
            ('a', vec![STOP.to_vec(), drive(100, 1)]),
            ('d', vec![STOP.to_vec(), drive(100, -1)]),
            (' ', vec![STOP.to_vec()]),
            ('c', vec![vec![135]]),
            ('h', vec![vec![143]]),
            (ESCAPE, vec![STOP.to_vec()]),
        ];

        for (key, expected) in cases {
            let (mock, mut controller) = started();
            assert_eq!(controller.handle_key(key), Flow::Continue, "key {:?}", key);
            assert_eq!(mock.frames(), expected, "key {:?}", key);
        }
    }

    #[test]
    fn test_quit_exits_without_extra_write() {
        let (mock, mut controller) = started();
        assert_eq!(controller.handle_key('q'), Flow::Exit);
        assert!(mock.frames().is_empty());
    }

    #[test]
    fn test_uppercase_matches_lowercase() {
        for key in ['w', 's', 'a', 'd', 'c', 'h'] {
            let (lower, mut c1) = started();
            let (upper, mut c2) = started();
            c1.handle_key(key);
            c2.handle_key(key.to_ascii_uppercase());
            assert_eq!(lower.frames(), upper.frames(), "key {:?}", key);
        }
    }

    #[test]
    fn test_unmapped_key_writes_nothing() {
        let (mock, mut controller) = started();
        for key in ['x', '1', '\n', 'é'] {
            assert_eq!(controller.handle_key(key), Flow::Continue);
        }
        assert!(mock.frames().is_empty());
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let (mock, controller) = started();
        mock.fail_next_writes(1);

        let mut keys = ScriptedKeys::from_keys("wsq");
        let summary = controller.run(&mut keys);

        assert_eq!(summary.reason, ExitReason::Quit);
        assert_eq!(summary.failed_writes, 1);
        assert_eq!(summary.keys_handled, 3);
        assert_eq!(
            mock.frames(),
            vec![drive(-200, RADIUS_STRAIGHT), STOP.to_vec()]
        );
        assert_eq!(mock.close_count(), 1);
    }

    #[test]
    fn test_input_closed_runs_exit_sequence() {
        let (mock, controller) = started();
        let mut keys = ScriptedKeys::from_keys("w");

        let summary = controller.run(&mut keys);

        assert_eq!(summary.reason, ExitReason::InputClosed);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(
            mock.frames(),
            vec![drive(200, RADIUS_STRAIGHT), STOP.to_vec()]
        );
        assert_eq!(mock.close_count(), 1);
    }

    #[test]
    fn test_input_error_runs_exit_sequence() {
        struct Broken;
        impl KeySource for Broken {
            fn read_key(&mut self) -> Result<InputEvent> {
                Err(Error::InputRead("tty gone".to_string()))
            }
        }

        let (mock, controller) = started();
        let summary = controller.run(&mut Broken);

        assert!(matches!(summary.reason, ExitReason::InputFailed(_)));
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(mock.frames(), vec![STOP.to_vec()]);
        assert_eq!(mock.close_count(), 1);
    }

    #[test]
    fn test_pacing_delay_follows_drive() {
        let mock = MockTransport::new();
        let config = TeleopConfig {
            command_delay_ms: 20,
            settle_delay_ms: 0,
            ..TeleopConfig::default()
        };
        let mut controller = Controller::start(mock.clone(), &config, Duration::ZERO).unwrap();

        let started_at = std::time::Instant::now();
        controller.handle_key('a'); // stop + pivot = two paced writes
        assert!(started_at.elapsed() >= Duration::from_millis(40));

        let started_at = std::time::Instant::now();
        controller.handle_key('c'); // mode opcodes are not paced
        assert!(started_at.elapsed() < Duration::from_millis(20));
    }
}

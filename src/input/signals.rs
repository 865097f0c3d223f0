//! SIGINT/SIGTERM watcher
//!
//! The watcher thread only raises the shared flag. It never writes to the
//! terminal, since the main thread may have it in raw mode; reporting the
//! interrupt is left to the control loop after the robot has been stopped.

use crate::error::Result;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Raise `shutdown` on the first SIGINT or SIGTERM
///
/// Handlers are installed before this returns, so a signal delivered
/// afterwards is never lost to the default disposition.
pub fn watch_signals(shutdown: Arc<AtomicBool>) -> Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    std::thread::Builder::new()
        .name("signal-handler".to_string())
        .spawn(move || {
            if signals.forever().next().is_some() {
                shutdown.store(true, Ordering::Relaxed);
            }
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_sigterm_raises_shutdown_flag() {
        let shutdown = Arc::new(AtomicBool::new(false));
        watch_signals(Arc::clone(&shutdown)).unwrap();

        signal_hook::low_level::raise(SIGTERM).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !shutdown.load(Ordering::Relaxed) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(shutdown.load(Ordering::Relaxed));
    }
}

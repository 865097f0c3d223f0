//! Mock transport for testing

use super::Transport;
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock transport for unit testing
///
/// Clones share state, so a test keeps one handle for inspection while the
/// controller owns the other.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

/// Link-level call seen by the mock, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOp {
    Write(Vec<u8>),
    Flush,
    Close,
}

#[derive(Default)]
struct MockTransportInner {
    frames: Vec<Vec<u8>>,
    ops: Vec<MockOp>,
    close_count: usize,
    flush_count: usize,
    failed_writes: usize,
    fail_next: usize,
    fail_all: bool,
    closed: bool,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every successful write, one entry per call
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.lock().frames.clone()
    }

    /// All written bytes concatenated
    pub fn get_written(&self) -> Vec<u8> {
        self.lock().frames.concat()
    }

    /// Clear written data
    pub fn clear_written(&self) {
        self.lock().frames.clear();
    }

    /// Number of `close()` calls
    pub fn close_count(&self) -> usize {
        self.lock().close_count
    }

    /// Number of `flush()` calls
    pub fn flush_count(&self) -> usize {
        self.lock().flush_count
    }

    /// Successful writes, flushes and closes in call order
    pub fn ops(&self) -> Vec<MockOp> {
        self.lock().ops.clone()
    }

    /// Number of writes that returned an error
    pub fn failed_writes(&self) -> usize {
        self.lock().failed_writes
    }

    /// Make the next `n` writes fail
    pub fn fail_next_writes(&self, n: usize) {
        self.lock().fail_next = n;
    }

    /// Make every write fail until switched off
    pub fn fail_all_writes(&self, fail: bool) {
        self.lock().fail_all = fail;
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(Error::TransportClosed);
        }
        if inner.fail_all || inner.fail_next > 0 {
            inner.fail_next = inner.fail_next.saturating_sub(1);
            inner.failed_writes += 1;
            return Err(Error::TransportWrite("mock write failure".to_string()));
        }
        inner.frames.push(data.to_vec());
        inner.ops.push(MockOp::Write(data.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(Error::TransportClosed);
        }
        inner.flush_count += 1;
        inner.ops.push(MockOp::Flush);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut inner = self.lock();
        inner.close_count += 1;
        inner.closed = true;
        inner.ops.push(MockOp::Close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_frames_and_closes() {
        let mock = MockTransport::new();
        let mut transport = mock.clone();

        transport.write(&[128]).unwrap();
        transport.write(&[137, 0, 0, 0, 0]).unwrap();
        transport.flush().unwrap();
        transport.close().unwrap();

        assert_eq!(mock.frames(), vec![vec![128], vec![137, 0, 0, 0, 0]]);
        assert_eq!(mock.get_written(), vec![128, 137, 0, 0, 0, 0]);
        assert_eq!(mock.flush_count(), 1);
        assert_eq!(mock.close_count(), 1);
        assert_eq!(
            mock.ops(),
            vec![
                MockOp::Write(vec![128]),
                MockOp::Write(vec![137, 0, 0, 0, 0]),
                MockOp::Flush,
                MockOp::Close,
            ]
        );
        assert!(matches!(transport.write(&[131]), Err(Error::TransportClosed)));
        assert!(matches!(transport.flush(), Err(Error::TransportClosed)));
    }

    #[test]
    fn test_failure_injection() {
        let mock = MockTransport::new();
        let mut transport = mock.clone();

        mock.fail_next_writes(2);
        assert!(transport.write(&[1]).is_err());
        assert!(transport.write(&[2]).is_err());
        assert!(transport.write(&[3]).is_ok());
        assert_eq!(mock.failed_writes(), 2);
        assert_eq!(mock.frames(), vec![vec![3]]);

        mock.fail_all_writes(true);
        assert!(transport.write(&[4]).is_err());
        mock.fail_all_writes(false);
        assert!(transport.write(&[5]).is_ok());
    }
}

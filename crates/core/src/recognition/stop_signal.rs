use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Cooperative stop request shared between the loop and its supervisor.
///
/// Clones share state. `request_stop` sets the flag and wakes any thread
/// blocked in [`StopSignal::sleep`].
#[derive(Clone)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
        // Full channel means a wake-up is already pending.
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration` unless a stop is requested first.
    ///
    /// Returns `true` if the loop should stop.
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_requested() {
            return true;
        }
        match self.wake_rx.recv_timeout(duration) {
            Ok(()) | Err(RecvTimeoutError::Timeout) => self.is_requested(),
            Err(RecvTimeoutError::Disconnected) => true,
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

use crossbeam_channel::{Receiver, TrySendError};
use std::thread::JoinHandle;
use std::time::Duration;

use super::error::IndexError;
use super::progress::{ProgressThrottle, ScanProgress};
use super::snapshot::IndexSnapshot;
use crate::decoder::PixelSource;

// Progress values are only a display hint; a tiny buffer is enough.
const PROGRESS_BUFFER: usize = 4;

/// Index build running on its own thread.
///
/// The worker posts progress over a bounded channel with `try_send`, so a
/// slow consumer drops updates instead of stalling the scan. The channel
/// disconnects when the scan ends.
pub struct ScanWorker {
    handle: JoinHandle<IndexSnapshot>,
    progress: Receiver<ScanProgress>,
}

impl ScanWorker {
    pub fn spawn<S>(source: S, interval: Duration) -> Self
    where
        S: PixelSource + Send + 'static,
    {
        Self::with_throttle(source, ProgressThrottle::new(interval))
    }

    pub(crate) fn with_throttle<S>(source: S, throttle: ProgressThrottle) -> Self
    where
        S: PixelSource + Send + 'static,
    {
        let (sender, progress) = crossbeam_channel::bounded(PROGRESS_BUFFER);

        let handle = std::thread::spawn(move || {
            let mut dropped = 0u64;
            let snapshot = IndexSnapshot::scan_throttled(&source, throttle, |p| {
                match sender.try_send(p) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => dropped += 1,
                    // Nobody is watching any more; keep scanning.
                    Err(TrySendError::Disconnected(_)) => {}
                }
            });
            if dropped > 0 {
                log::debug!("scan worker dropped {dropped} progress updates");
            }
            snapshot
        });

        Self { handle, progress }
    }

    pub fn progress(&self) -> &Receiver<ScanProgress> {
        &self.progress
    }

    /// Wait for the scan and hand back the finished snapshot.
    pub fn finish(self) -> Result<IndexSnapshot, IndexError> {
        self.handle.join().map_err(|_| {
            log::warn!("scan worker panicked");
            IndexError::ScanPanicked
        })
    }
}

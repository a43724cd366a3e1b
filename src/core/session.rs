use std::sync::Arc;

use super::error::IndexError;
use super::region_query::{QueryOutcome, RegionQuery};
use super::snapshot::{IndexSnapshot, SnapshotRecord};

/// Holder of the currently installed index.
///
/// A snapshot is only ever installed whole, so readers either see the
/// previous index or the new one.
#[derive(Default)]
pub struct Session {
    current: Option<Arc<IndexSnapshot>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a finished snapshot, returning the one it replaced.
    pub fn install(&mut self, snapshot: IndexSnapshot) -> Option<Arc<IndexSnapshot>> {
        log::debug!(
            "installing index: {} colors, {}x{}",
            snapshot.index().len(),
            snapshot.meta().width,
            snapshot.meta().height
        );
        self.current.replace(Arc::new(snapshot))
    }

    pub fn current(&self) -> Result<Arc<IndexSnapshot>, IndexError> {
        self.current.clone().ok_or(IndexError::NoIndexAvailable)
    }

    pub fn has_index(&self) -> bool {
        self.current.is_some()
    }

    pub fn search(&self, query: &RegionQuery) -> Result<QueryOutcome, IndexError> {
        query.run(&*self.current()?)
    }

    pub fn export(&self) -> Result<SnapshotRecord, IndexError> {
        Ok(self.current()?.to_record())
    }

    /// Validate and install an imported record. On failure the installed
    /// index stays as it was.
    pub fn import(&mut self, record: SnapshotRecord) -> Result<Arc<IndexSnapshot>, IndexError> {
        let snapshot = IndexSnapshot::from_record(record)?;
        self.install(snapshot);
        self.current()
    }
}

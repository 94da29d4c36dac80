//! The process-wide snapshot store and the `SnapshotLoader` seam.
//!
//! Readers take an `Arc<Snapshot>` once per query and work on that value; a
//! concurrent [`SnapshotStore::publish`] swaps the pointer and never touches
//! the snapshot a reader already holds.

use std::{
  future::Future,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use arc_swap::ArcSwap;
use chrono::Utc;

use crate::snapshot::Snapshot;

// ─── Loader trait ────────────────────────────────────────────────────────────

/// Abstraction over a source that produces complete snapshots.
///
/// Implemented by `epitrack-source` (HTTP and file backends). A load is
/// all-or-nothing: it either returns a whole snapshot or an error.
pub trait SnapshotLoader: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch and normalize the upstream table into a fresh snapshot.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Holds the current snapshot behind a single atomically swappable pointer.
#[derive(Debug)]
pub struct SnapshotStore {
  current:    ArcSwap<Snapshot>,
  generation: AtomicU64,
}

impl Default for SnapshotStore {
  fn default() -> Self { Self::new() }
}

impl SnapshotStore {
  /// A store serving the empty placeholder snapshot.
  pub fn new() -> Self {
    Self {
      current:    ArcSwap::from_pointee(Snapshot::empty()),
      generation: AtomicU64::new(0),
    }
  }

  /// The snapshot current at the time of the call.
  pub fn current(&self) -> Arc<Snapshot> { self.current.load_full() }

  /// Stamp `snapshot` with the next generation and make it current.
  pub fn publish(&self, mut snapshot: Snapshot) -> Arc<Snapshot> {
    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
    snapshot.stamp(generation, Utc::now());
    let snapshot = Arc::new(snapshot);
    self.current.store(Arc::clone(&snapshot));
    snapshot
  }
}

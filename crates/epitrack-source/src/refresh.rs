//! Background refresh loop.
//!
//! Each tick loads a fresh snapshot and publishes it. A failed load is logged
//! and the previously published snapshot keeps serving. Ticks are measured
//! start to start, so a slow fetch shortens the idle time that follows it.

use std::{future::Future, sync::Arc, time::Duration};

use epitrack_core::{
  snapshot::Snapshot,
  store::{SnapshotLoader, SnapshotStore},
};
use tokio::{
  task::JoinHandle,
  time::{self, MissedTickBehavior},
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

/// Shortest period the loop will tick at; shorter requests are raised to it.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct RefreshScheduler<L> {
  loader:   L,
  store:    Arc<SnapshotStore>,
  interval: Duration,
}

impl<L> RefreshScheduler<L>
where
  L: SnapshotLoader + 'static,
{
  pub fn new(loader: L, store: Arc<SnapshotStore>) -> Self {
    Self {
      loader,
      store,
      interval: DEFAULT_INTERVAL,
    }
  }

  pub fn interval(mut self, interval: Duration) -> Self {
    self.interval = interval.max(MIN_INTERVAL);
    self
  }

  /// Load once and publish on success. On failure the store is untouched.
  pub async fn refresh_once(&self) -> Result<Arc<Snapshot>, L::Error> {
    let snapshot = self.loader.load().await?;
    let published = self.store.publish(snapshot);
    tracing::info!(
      generation = published.generation(),
      rows = published.len(),
      countries = published.countries().len(),
      "published snapshot"
    );
    Ok(published)
  }

  /// Refresh on every tick until `shutdown` resolves. The first tick fires
  /// immediately. An in-flight load is abandoned on shutdown.
  pub async fn run<F>(self, shutdown: F)
  where
    F: Future<Output = ()>,
  {
    let mut ticker = time::interval(self.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
      tokio::select! {
        _ = &mut shutdown => break,
        _ = ticker.tick() => {}
      }
      tokio::select! {
        _ = &mut shutdown => break,
        result = self.refresh_once() => {
          if let Err(err) = result {
            tracing::warn!(
              error = %err,
              serving_generation = self.store.current().generation(),
              "refresh failed; keeping previous snapshot"
            );
          }
        }
      }
    }

    tracing::info!("refresh loop stopped");
  }

  /// Run the loop on its own tokio task.
  pub fn spawn<F>(self, shutdown: F) -> JoinHandle<()>
  where
    F: Future<Output = ()> + Send + 'static,
  {
    tokio::spawn(self.run(shutdown))
  }
}

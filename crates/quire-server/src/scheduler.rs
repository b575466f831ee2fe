//! Change detection loop that rebuilds the site when notes change.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use quire_static::{diff, scan, Change, FingerprintSet, SiteBuilder};

use crate::server::ServerError;

/// Default pause between two scans.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// How often the loop reports that it is alive.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(300);

/// Pause after a failed tick.
const ERROR_PAUSE: Duration = Duration::from_secs(1);

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Unchanged,
    Rebuilt(Change),
}

/// Polls the source directory and rebuilds on change.
///
/// Owns the fingerprints of the last successful build. A failed rebuild
/// keeps the old set, so the next tick tries again.
pub struct Scheduler {
    builder: Arc<SiteBuilder>,
    current: FingerprintSet,
    interval: Duration,
}

impl Scheduler {
    pub fn new(builder: Arc<SiteBuilder>, current: FingerprintSet, interval: Duration) -> Self {
        Self {
            builder,
            current,
            interval,
        }
    }

    pub fn fingerprints(&self) -> &FingerprintSet {
        &self.current
    }

    /// Scan once and rebuild if anything changed.
    pub async fn tick(&mut self) -> Result<TickOutcome, ServerError> {
        let source_dir = self.builder.source_dir().to_path_buf();
        let latest = tokio::task::spawn_blocking(move || scan(&source_dir))
            .await
            .map_err(|e| ServerError::TaskError(e.to_string()))?
            .map_err(|e| ServerError::ScanError(e.to_string()))?;

        let Some(change) = diff(&self.current, &latest) else {
            return Ok(TickOutcome::Unchanged);
        };

        tracing::info!("Changes detected ({}), rebuilding", change);

        let builder = Arc::clone(&self.builder);
        let result = tokio::task::spawn_blocking(move || builder.rebuild_from_config())
            .await
            .map_err(|e| ServerError::TaskError(e.to_string()))??;

        tracing::info!(
            "Rebuilt {} pages in {}ms",
            result.pages.len(),
            result.duration_ms
        );
        self.current = result.fingerprints;

        Ok(TickOutcome::Rebuilt(change))
    }

    /// Tick every interval until `shutdown` turns true.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut poll = time::interval(self.interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut health = time::interval_at(
            Instant::now() + HEALTH_CHECK_INTERVAL,
            HEALTH_CHECK_INTERVAL,
        );

        tracing::debug!("Polling for changes every {:?}", self.interval);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = health.tick() => {
                    tracing::info!("Health check: running, tracking {} notes", self.current.len());
                }
                _ = poll.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::error!("Change detection failed: {}", e);
                        time::sleep(ERROR_PAUSE).await;
                    }
                }
            }
        }

        tracing::info!("Change detection stopped");
    }
}

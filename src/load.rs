use crate::api::{ApiError, CountrySource, Query};
use crate::country::Country;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

/// Minimum time the list screen keeps its loading indicator up.
pub const LIST_MIN_DISPLAY: Duration = Duration::from_millis(3000);

/// Minimum time the detail screen keeps its loading indicator up.
pub const DETAIL_MIN_DISPLAY: Duration = Duration::from_millis(2000);

/// Result of one screen mount's fetch, sent from the load task to the UI.
#[derive(Debug)]
pub struct LoadMessage {
    /// Mount generation the result belongs to.
    pub generation: u64,
    pub result: Result<Vec<Country>, ApiError>,
}

/// Channel pair between load tasks and the UI loop.
pub struct LoadChannels {
    pub tx: UnboundedSender<LoadMessage>,
    pub rx: UnboundedReceiver<LoadMessage>,
}

impl LoadChannels {
    pub fn new() -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for LoadChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the single fetch for a mount.
///
/// The fetch and the minimum display delay run together, so the result is
/// delivered no sooner than `min_display` after mount. A cancelled mount
/// sends nothing.
pub fn spawn_load(
    source: Arc<dyn CountrySource>,
    query: Query,
    min_display: Duration,
    generation: u64,
    cancel: CancellationToken,
    tx: UnboundedSender<LoadMessage>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let work = async {
            let (result, _) = tokio::join!(
                source.fetch(&query, &cancel),
                tokio::time::sleep(min_display)
            );
            result
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = work => Some(result),
        };

        match result {
            Some(result) if !cancel.is_cancelled() => {
                if tx.send(LoadMessage { generation, result }).is_err() {
                    tracing::debug!(generation, "ui gone, dropping load result");
                }
            }
            _ => tracing::debug!(generation, %query, "mount cancelled, result discarded"),
        }
    })
}

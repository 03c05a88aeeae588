//! Periodic refresh of a route's snapshot.
//!
//! A [`PollingPublisher`] runs at most one loop at a time. Each cycle fetches,
//! publishes on success, reports on failure, then sleeps for the poll
//! interval. Only `stop`, a new `start_updates` or dropping the publisher end
//! a loop; fetch errors never do.

mod event;
mod handle;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_core::Stream;
use route_watch_transit::{CoordinateFetcher, FetchError, RouteKey, Snapshot};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, oneshot, watch};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, EndpointConfig};
use crate::fetch::HttpCoordinateFetcher;

pub use event::PollEvent;
pub use handle::PollHandle;

const EVENT_CAPACITY: usize = 64;

/// Shortest wait between cycles; smaller intervals are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct PollingPublisher {
    fetcher: Arc<dyn CoordinateFetcher>,
    interval: Duration,
    runtime: Handle,
    shared: Arc<Shared>,
    active: Mutex<Option<PollHandle>>,
}

struct Shared {
    snapshot: watch::Sender<Snapshot>,
    events: broadcast::Sender<PollEvent>,
    publish: Mutex<PublishState>,
}

/// Writes to the snapshot and every loop event happen under this lock, and
/// only while the writing loop's epoch is still current. Cancelling bumps the
/// epoch under the same lock, so nothing is written or emitted for a loop
/// once its cancellation has returned.
#[derive(Default)]
struct PublishState {
    epoch: u64,
    last_updated: Option<DateTime<Utc>>,
}

impl PollingPublisher {
    pub fn new(fetcher: Arc<dyn CoordinateFetcher>, interval: Duration, runtime: Handle) -> Self {
        if interval < MIN_POLL_INTERVAL {
            warn!(?interval, minimum = ?MIN_POLL_INTERVAL, "poll interval raised to minimum");
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (snapshot, _) = watch::channel(Snapshot::empty());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            fetcher,
            interval,
            runtime,
            shared: Arc::new(Shared {
                snapshot,
                events,
                publish: Mutex::new(PublishState::default()),
            }),
            active: Mutex::new(None),
        }
    }

    /// Publisher polling the configured HTTP endpoint.
    pub fn from_config(config: &EndpointConfig, runtime: Handle) -> Result<Self, ConfigError> {
        config.validate()?;
        let fetcher = HttpCoordinateFetcher::from_config(config)?;
        Ok(Self::new(Arc::new(fetcher), config.poll_interval, runtime))
    }

    /// Start polling `key`, replacing whatever loop was running.
    ///
    /// The previous loop is cancelled before this returns.
    pub fn start_updates(&self, key: RouteKey) {
        let mut active = lock(&self.active);
        if let Some(previous) = active.take() {
            self.cancel(previous);
        }

        let epoch = {
            let state = lock(&self.shared.publish);
            // Sent before the loop exists so it always precedes the loop's events
            self.shared.emit(PollEvent::Started { key: key.clone() });
            state.epoch
        };
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let poll_loop = PollLoop {
            key: key.clone(),
            epoch,
            interval: self.interval,
            fetcher: Arc::clone(&self.fetcher),
            shared: Arc::clone(&self.shared),
        };
        let task = self.runtime.spawn(poll_loop.run(shutdown_rx));

        info!(%key, interval = ?self.interval, "started polling");

        *active = Some(PollHandle::new(key, task, shutdown_tx));
    }

    /// Cancel the running loop, if any. The published snapshot is kept.
    pub fn stop(&self) -> bool {
        match lock(&self.active).take() {
            Some(handle) => {
                self.cancel(handle);
                true
            }
            None => false,
        }
    }

    fn cancel(&self, handle: PollHandle) {
        let mut state = lock(&self.shared.publish);
        state.epoch += 1;
        let key = handle.cancel();
        self.shared.emit(PollEvent::Stopped { key: key.clone() });
        drop(state);

        info!(%key, "stopped polling");
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a loop is bound and its task has not exited.
    pub fn is_running(&self) -> bool {
        lock(&self.active)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn active_key(&self) -> Option<RouteKey> {
        lock(&self.active).as_ref().map(|handle| handle.key().clone())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Wall-clock time of the last successful publish.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        lock(&self.shared.publish).last_updated
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshot.subscribe()
    }

    /// The current snapshot, then every replacement after it.
    ///
    /// Slow consumers skip intermediate snapshots. The stream ends once the
    /// publisher and all of its loops are gone.
    pub fn snapshots(&self) -> impl Stream<Item = Snapshot> + Send + use<> {
        let mut receiver = self.subscribe();
        receiver.mark_changed();

        futures_util::stream::unfold(receiver, |mut receiver| async move {
            receiver.changed().await.ok()?;
            let snapshot = receiver.borrow_and_update().clone();
            Some((snapshot, receiver))
        })
    }

    pub fn events(&self) -> broadcast::Receiver<PollEvent> {
        self.shared.events.subscribe()
    }
}

impl Drop for PollingPublisher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn publish(&self, epoch: u64, key: &RouteKey, snapshot: Snapshot) -> bool {
        let mut state = lock(&self.publish);
        if state.epoch != epoch {
            return false;
        }

        let points = snapshot.len();
        self.snapshot.send_replace(snapshot);
        state.last_updated = Some(Utc::now());
        self.emit(PollEvent::Updated {
            key: key.clone(),
            points,
        });
        drop(state);

        debug!(%key, points, "published snapshot");
        true
    }

    /// Emit a failure for a loop that is still current. Returns false once
    /// the loop has been cancelled.
    fn report_failure(&self, epoch: u64, key: &RouteKey, error: &FetchError) -> bool {
        let state = lock(&self.publish);
        if state.epoch != epoch {
            return false;
        }

        self.emit(PollEvent::failed(key.clone(), error));
        drop(state);

        warn!(%key, kind = %error.kind(), "failed to refresh positions: {error}");
        true
    }

    fn emit(&self, event: PollEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

struct PollLoop {
    key: RouteKey,
    epoch: u64,
    interval: Duration,
    fetcher: Arc<dyn CoordinateFetcher>,
    shared: Arc<Shared>,
}

impl PollLoop {
    async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) {
        loop {
            let result = tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                result = self.fetcher.fetch(&self.key) => result,
            };

            match result {
                Ok(snapshot) => {
                    if !self.shared.publish(self.epoch, &self.key, snapshot) {
                        break;
                    }
                }
                Err(error) => {
                    if !self.shared.report_failure(self.epoch, &self.key, &error) {
                        break;
                    }
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        debug!(key = %self.key, "polling loop exited");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

use route_watch_transit::RouteKey;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running polling loop. Dropping the handle shuts the loop down.
pub struct PollHandle {
    key: RouteKey,
    task: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl PollHandle {
    pub(crate) fn new(key: RouteKey, task: JoinHandle<()>, shutdown_tx: oneshot::Sender<()>) -> Self {
        Self {
            key,
            task,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub(crate) fn cancel(mut self) -> RouteKey {
        self.signal_shutdown();
        self.key.clone()
    }

    fn signal_shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.signal_shutdown();
    }
}

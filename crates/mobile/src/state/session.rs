use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use route_watch_core::transit::{RouteKey, TransportKind};
use route_watch_core::{ConfigError, EndpointConfig, PollEvent, PollingPublisher};
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::logging::setup_logging;
use crate::state::theme::ThemePreferences;
use crate::types::{TransportMode, VehiclePosition};

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum SessionError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),

    #[error("failed to save preferences: {0}")]
    Preferences(std::io::Error),
}

/// Receives positions and poll failures on a background thread.
#[uniffi::export(with_foreign)]
pub trait PositionListener: Send + Sync {
    fn on_positions(&self, positions: Vec<VehiclePosition>);
    fn on_failure(&self, kind: String, message: String);
}

/// Everything one app session owns: the polling publisher, the runtime it
/// runs on, and the theme preference.
#[derive(uniffi::Object)]
pub struct TrackerSession {
    publisher: PollingPublisher,
    theme: ThemePreferences,
    listener: Mutex<Option<JoinHandle<()>>>,
    runtime: Runtime,
}

#[uniffi::export]
impl TrackerSession {
    /// `endpoint_json` overrides the compiled-in endpoint, see `EndpointConfig`.
    #[uniffi::constructor]
    pub fn new(base_path: String, endpoint_json: Option<String>) -> Result<Arc<Self>, SessionError> {
        setup_logging();

        let config = match endpoint_json {
            Some(json) => EndpointConfig::from_json(&json)?,
            None => EndpointConfig::default(),
        };
        let runtime = Runtime::new().map_err(SessionError::Runtime)?;
        let publisher = PollingPublisher::from_config(&config, runtime.handle().clone())?;
        let theme = ThemePreferences::in_dir(PathBuf::from(base_path));

        info!(base_url = %config.base_url, "tracker session ready");

        Ok(Arc::new(Self {
            publisher,
            theme,
            listener: Mutex::new(None),
            runtime,
        }))
    }

    pub fn start_updates(&self, transport_type: String, route_number: String) {
        self.publisher
            .start_updates(RouteKey::new(transport_type, route_number));
    }

    pub fn start_route(&self, mode: TransportMode, route_number: String) {
        let kind = TransportKind::from(mode);
        if !kind.has_route(&route_number) {
            warn!(%route_number, ?kind, "route is not in the catalog");
        }
        self.publisher.start_updates(kind.key(route_number));
    }

    pub fn stop(&self) -> bool {
        self.publisher.stop()
    }

    /// `"{transport_type}/{route_number}"` of the running loop.
    pub fn active_route(&self) -> Option<String> {
        self.publisher.active_key().map(|key| key.to_string())
    }

    pub fn current_positions(&self) -> Vec<VehiclePosition> {
        self.publisher
            .snapshot()
            .iter()
            .map(VehiclePosition::from)
            .collect()
    }

    /// Seconds since the last successful refresh, `None` before the first.
    pub fn seconds_since_update(&self) -> Option<i64> {
        self.publisher
            .last_updated()
            .map(|at| (Utc::now() - at).num_seconds())
    }

    /// Replace the listener. It is called with the current positions first.
    pub fn set_listener(&self, listener: Arc<dyn PositionListener>) {
        let mut snapshots = self.publisher.subscribe();
        let mut events = self.publisher.events();
        snapshots.mark_changed();

        let task = self.runtime.spawn(async move {
            loop {
                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let positions: Vec<VehiclePosition> =
                            snapshots.borrow_and_update().iter().map(VehiclePosition::from).collect();
                        listener.on_positions(positions);
                    }
                    event = events.recv() => match event {
                        Ok(PollEvent::Failed { kind, message, .. }) => {
                            listener.on_failure(kind.to_string(), message);
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "listener fell behind on poll events");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });

        if let Some(previous) = self.lock_listener().replace(task) {
            previous.abort();
        }
    }

    pub fn clear_listener(&self) {
        if let Some(previous) = self.lock_listener().take() {
            previous.abort();
        }
    }

    pub fn is_dark_theme(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn toggle_theme(&self) -> Result<bool, SessionError> {
        self.theme.toggle().map_err(SessionError::Preferences)
    }
}

impl TrackerSession {
    fn lock_listener(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TrackerSession {
    fn drop(&mut self) {
        self.clear_listener();
        self.publisher.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    // Nothing listens on the discard port, so every poll fails fast
    const UNREACHABLE: &str = r#"{ "base_url": "http://127.0.0.1:9", "request_timeout_ms": 200 }"#;

    struct ChannelListener(Mutex<mpsc::Sender<Vec<VehiclePosition>>>);

    impl PositionListener for ChannelListener {
        fn on_positions(&self, positions: Vec<VehiclePosition>) {
            let _ = self.0.lock().unwrap().send(positions);
        }

        fn on_failure(&self, _kind: String, _message: String) {}
    }

    fn session(dir: &TempDir) -> Arc<TrackerSession> {
        TrackerSession::new(
            dir.path().display().to_string(),
            Some(UNREACHABLE.to_owned()),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let dir = TempDir::new().unwrap();
        let result = TrackerSession::new(
            dir.path().display().to_string(),
            Some(r#"{ "poll_interval_ms": 0 }"#.to_owned()),
        );
        assert!(matches!(result, Err(SessionError::Config(ConfigError::ZeroInterval))));
    }

    #[test]
    fn test_start_and_stop() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir);
        assert_eq!(session.active_route(), None);

        session.start_route(TransportMode::Tram, "5".to_owned());
        assert_eq!(session.active_route().as_deref(), Some("трамвай/5"));

        session.start_updates("автобус".to_owned(), "24".to_owned());
        assert_eq!(session.active_route().as_deref(), Some("автобус/24"));

        assert!(session.stop());
        assert_eq!(session.active_route(), None);
        assert!(session.current_positions().is_empty());
        assert_eq!(session.seconds_since_update(), None);
    }

    #[test]
    fn test_listener_receives_current_positions() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir);
        let (tx, rx) = mpsc::channel();

        session.set_listener(Arc::new(ChannelListener(Mutex::new(tx))));

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(first.is_empty());
        session.clear_listener();
    }

    #[test]
    fn test_theme_survives_sessions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().display().to_string();

        let session = TrackerSession::new(path.clone(), None).unwrap();
        assert!(!session.is_dark_theme());
        assert!(session.toggle_theme().unwrap());
        drop(session);

        let session = TrackerSession::new(path, None).unwrap();
        assert!(session.is_dark_theme());
    }
}

pub mod config;
pub mod fetch;
pub mod poll;

// Re-export the data model from the transit crate
pub use route_watch_transit as transit;

pub use config::{ConfigError, EndpointConfig, PathTemplate};
pub use fetch::{HttpCoordinateFetcher, ReqwestTransport, RemoteCoordinateFetcher};
pub use poll::{PollEvent, PollHandle, PollingPublisher};

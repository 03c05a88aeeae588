//! Position data models, types, and the transport catalog.

pub mod catalog;
pub mod types;

// Re-exports for convenience
pub use catalog::TransportKind;
pub use types::{FetchError, FetchErrorKind, GeoPoint, Result, Snapshot};

//! # route-watch-transit
//!
//! Data model for live vehicle positions.
//!
//! ## Features
//!
//! - **Route keys**: cheap-to-clone identifiers for the polled route
//! - **Snapshots**: immutable, wholesale-replaced sets of positions
//! - **Catalog**: transport kinds and the route numbers each one serves
//! - **Pluggable networking**: implement your own transport or fetcher
//!
//! ## Example
//!
//! ```
//! use route_watch_transit::prelude::*;
//!
//! let key = TransportKind::Tram.key("5");
//! assert_eq!(key.to_string(), "трамвай/5");
//!
//! let snapshot: Snapshot = vec![GeoPoint::new(56.85, 60.61)].into();
//! assert_eq!(snapshot.len(), 1);
//! assert!(snapshot[0].is_valid());
//! ```

pub mod identifiers;
pub mod models;
pub mod network;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{catalog::*, types::*};
    pub use crate::network::traits::*;
}

pub use prelude::*;

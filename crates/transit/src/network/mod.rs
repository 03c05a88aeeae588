//! Network abstractions.

pub mod traits;

pub use traits::{CoordinateFetcher, HttpResponse, HttpTransport};

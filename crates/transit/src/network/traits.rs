//! Pluggable networking traits.
//!
//! External crates implement these to provide data fetching capabilities.

use std::future::Future;
use std::pin::Pin;

use crate::identifiers::RouteKey;
use crate::models::types::{Result, Snapshot};

/// Status and raw body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issue a GET and hand back whatever the server answered.
///
/// Implementations only fail for transport problems (connection, timeout);
/// a non-success status is still an `Ok` response.
pub trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>>;
}

/// Produce the current snapshot for a route.
pub trait CoordinateFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        key: &'a RouteKey,
    ) -> Pin<Box<dyn Future<Output = Result<Snapshot>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let response = |status| HttpResponse { status, body: Vec::new() };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(304).is_success());
        assert!(!response(500).is_success());
    }
}

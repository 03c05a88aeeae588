//! One-shot retrieval of the vehicle positions for a route.

pub mod decode;
pub mod transport;

use std::future::Future;
use std::pin::Pin;

use reqwest::Url;
use route_watch_transit::{
    CoordinateFetcher, FetchError, HttpTransport, Result, RouteKey, Snapshot,
};

use crate::config::{ConfigError, EndpointConfig, PathTemplate};

pub use decode::decode_snapshot;
pub use transport::ReqwestTransport;

pub type HttpCoordinateFetcher = RemoteCoordinateFetcher<ReqwestTransport>;

/// Fetches a route's positions with a single GET per call.
///
/// No retries and no caching: a failed call is reported and the caller
/// decides what to do with the previous snapshot.
#[derive(Debug)]
pub struct RemoteCoordinateFetcher<T> {
    transport: T,
    base_url: Url,
    template: PathTemplate,
}

impl HttpCoordinateFetcher {
    pub fn from_config(config: &EndpointConfig) -> std::result::Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Self::new(transport, config)
    }
}

impl<T: HttpTransport> RemoteCoordinateFetcher<T> {
    pub fn new(transport: T, config: &EndpointConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            transport,
            base_url: config.base()?,
            template: config.path_template,
        })
    }

    pub fn url_for(&self, key: &RouteKey) -> Url {
        let mut url = self.base_url.clone();

        // The base was checked to carry a path when the fetcher was built
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            if self.template == PathTemplate::TypeAndRoute {
                segments.push(key.transport_type.as_str());
            }
            segments.push(key.route_number.as_str());
        }

        url
    }

    pub async fn fetch_snapshot(&self, key: &RouteKey) -> Result<Snapshot> {
        let url = self.url_for(key);
        let response = self.transport.get(url.as_str()).await?;

        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }

        decode_snapshot(&response.body)
    }
}

impl<T: HttpTransport> CoordinateFetcher for RemoteCoordinateFetcher<T> {
    fn fetch<'a>(
        &'a self,
        key: &'a RouteKey,
    ) -> Pin<Box<dyn Future<Output = Result<Snapshot>> + Send + 'a>> {
        Box::pin(self.fetch_snapshot(key))
    }
}

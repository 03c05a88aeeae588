use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use route_watch_transit::{FetchError, HttpResponse, HttpTransport, Result};

use crate::config::ConfigError;

/// [`HttpTransport`] backed by a shared reqwest client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> std::result::Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(network_error)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(network_error)?;

            Ok(HttpResponse {
                status,
                body: body.to_vec(),
            })
        })
    }
}

fn network_error(error: reqwest::Error) -> FetchError {
    let cause = if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    };
    FetchError::Network { cause }
}

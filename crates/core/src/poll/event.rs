use route_watch_transit::{FetchError, FetchErrorKind, RouteKey};

/// Observable outcome of the polling loop.
///
/// Failures never stop the loop; this is how a caller learns about them
/// without scraping logs.
#[derive(Clone, Debug, PartialEq)]
pub enum PollEvent {
    Started {
        key: RouteKey,
    },
    Updated {
        key: RouteKey,
        points: usize,
    },
    Failed {
        key: RouteKey,
        kind: FetchErrorKind,
        message: String,
    },
    Stopped {
        key: RouteKey,
    },
}

impl PollEvent {
    pub(crate) fn failed(key: RouteKey, error: &FetchError) -> Self {
        Self::Failed {
            key,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn key(&self) -> &RouteKey {
        match self {
            Self::Started { key }
            | Self::Updated { key, .. }
            | Self::Failed { key, .. }
            | Self::Stopped { key } => key,
        }
    }
}

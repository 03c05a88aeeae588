//! Core data types for vehicle positions.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

// ============================================================================
// Positions
// ============================================================================

/// A single vehicle position in WGS84 degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components finite and inside the WGS84 ranges.
    ///
    /// Decoding does not reject out-of-range points; consumers that plot
    /// them can filter with this.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<GeoPoint> for geo::Point {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl From<geo::Point> for GeoPoint {
    fn from(point: geo::Point) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// Every vehicle position known for one route at one moment.
///
/// Replaced wholesale on every successful poll. Cloning shares the backing
/// slice, so publishing a snapshot is a pointer swap.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot(Arc<[GeoPoint]>);

impl Snapshot {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<GeoPoint> {
        self.0.to_vec()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Snapshot {
    type Target = [GeoPoint];

    fn deref(&self) -> &[GeoPoint] {
        &self.0
    }
}

impl From<Vec<GeoPoint>> for Snapshot {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self(points.into())
    }
}

impl FromIterator<GeoPoint> for Snapshot {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a single fetch produced no snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("server responded with status {status}")]
    Http { status: u16 },

    #[error("server returned an empty body")]
    EmptyBody,

    #[error("could not decode coordinates: {detail}")]
    Decode { detail: String },

    #[error("network error: {cause}")]
    Network { cause: String },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Http { .. } => FetchErrorKind::Http,
            FetchError::EmptyBody => FetchErrorKind::EmptyBody,
            FetchError::Decode { .. } => FetchErrorKind::Decode,
            FetchError::Network { .. } => FetchErrorKind::Network,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Http,
    EmptyBody,
    Decode,
    Network,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::Http => "http",
            FetchErrorKind::EmptyBody => "empty_body",
            FetchErrorKind::Decode => "decode",
            FetchErrorKind::Network => "network",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_validity() {
        assert!(GeoPoint::new(56.85, 60.61).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.1).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_point_geo_axis_order() {
        let point: geo::Point = GeoPoint::new(56.85, 60.61).into();
        assert_relative_eq!(point.x(), 60.61);
        assert_relative_eq!(point.y(), 56.85);

        let back: GeoPoint = point.into();
        assert_eq!(back, GeoPoint::new(56.85, 60.61));
    }

    #[test]
    fn test_snapshot_clone_shares_points() {
        let snapshot: Snapshot = vec![GeoPoint::new(1.0, 2.0)].into();
        let clone = snapshot.clone();

        assert!(Arc::ptr_eq(&snapshot.0, &clone.0));
        assert_eq!(clone.len(), 1);
        assert!(Snapshot::empty().is_empty());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(FetchError::Http { status: 500 }.kind(), FetchErrorKind::Http);
        assert_eq!(FetchError::EmptyBody.kind(), FetchErrorKind::EmptyBody);
        assert_eq!(FetchErrorKind::EmptyBody.to_string(), "empty_body");
        assert_eq!(
            FetchError::Http { status: 503 }.to_string(),
            "server responded with status 503"
        );
    }
}

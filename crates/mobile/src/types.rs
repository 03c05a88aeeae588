use route_watch_core::transit::{GeoPoint, TransportKind};

#[derive(Clone, Copy, Debug, PartialEq, uniffi::Record)]
pub struct VehiclePosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&GeoPoint> for VehiclePosition {
    fn from(point: &GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum TransportMode {
    Bus,
    Trolleybus,
    Tram,
}

impl From<TransportMode> for TransportKind {
    fn from(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Bus => TransportKind::Bus,
            TransportMode::Trolleybus => TransportKind::Trolleybus,
            TransportMode::Tram => TransportKind::Tram,
        }
    }
}

/// Route numbers the picker offers for a transport mode.
#[uniffi::export]
pub fn route_numbers(mode: TransportMode) -> Vec<String> {
    TransportKind::from(mode)
        .routes()
        .iter()
        .map(|route| (*route).to_owned())
        .collect()
}

/// Path segment the position server expects for a transport mode.
#[uniffi::export]
pub fn transport_type(mode: TransportMode) -> String {
    TransportKind::from(mode).path_segment().to_owned()
}

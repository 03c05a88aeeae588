//! Transport kinds served by the position feed and their route numbers.

use crate::identifiers::{RouteKey, RouteNumber, TransportType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Bus,
    Trolleybus,
    Tram,
}

const BUS_ROUTES: &[&str] = &[
    "06", "24", "24с", "25", "28", "40", "41", "42", "43", "043", "44", "45", "46", "47", "48",
    "49", "50", "51", "52", "053", "53", "054", "54", "55", "56", "57", "58", "59", "60", "61",
    "62", "63", "65", "66", "67", "68", "69", "70", "71", "72", "73", "74", "75", "76", "77",
    "78", "79", "80", "81", "82", "83", "85", "86", "87", "88", "89", "90", "91", "91м", "92",
    "93", "94", "95", "96", "96б", "97", "98м", "98", "99",
];

const TROLLEYBUS_ROUTES: &[&str] = &[
    "25", "26", "27", "28", "29", "30", "31", "32", "33", "34", "35", "36", "37", "38", "39",
];

const TRAM_ROUTES: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "23", "24",
];

impl TransportKind {
    pub const ALL: [TransportKind; 3] = [Self::Bus, Self::Trolleybus, Self::Tram];

    /// The segment the position server expects in the request path.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Bus => "автобус",
            Self::Trolleybus => "троллейбус",
            Self::Tram => "трамвай",
        }
    }

    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == segment)
    }

    /// Route numbers offered for this kind, in display order.
    pub fn routes(self) -> &'static [&'static str] {
        match self {
            Self::Bus => BUS_ROUTES,
            Self::Trolleybus => TROLLEYBUS_ROUTES,
            Self::Tram => TRAM_ROUTES,
        }
    }

    pub fn has_route(self, route_number: &str) -> bool {
        self.routes().contains(&route_number)
    }

    pub fn transport_type(self) -> TransportType {
        TransportType::new(self.path_segment())
    }

    pub fn key(self, route_number: impl Into<RouteNumber>) -> RouteKey {
        RouteKey {
            transport_type: self.transport_type(),
            route_number: route_number.into(),
        }
    }
}

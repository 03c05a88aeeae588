//! Decoding of position payloads.
//!
//! The server answers in one of two shapes:
//!
//! - `[[lat, lon], ...]`
//! - `{ "coordinates": [{ "latitude": .., "longitude": .. }, ...] }`
//!
//! Anything else is a [`FetchError::Decode`]; no partial snapshot is produced.

use route_watch_transit::{FetchError, GeoPoint, Result, Snapshot};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct CoordinateEnvelope {
    coordinates: Vec<GeoPoint>,
}

pub fn decode_snapshot(body: &[u8]) -> Result<Snapshot> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::EmptyBody);
    }

    let value: Value = serde_json::from_slice(body).map_err(decode_error)?;

    match value {
        Value::Array(_) => decode_pairs(value),
        Value::Object(_) => {
            let envelope: CoordinateEnvelope = serde_json::from_value(value).map_err(decode_error)?;
            Ok(envelope.coordinates.into())
        }
        other => Err(FetchError::Decode {
            detail: format!("expected an array or object, found {}", json_type(&other)),
        }),
    }
}

fn decode_pairs(value: Value) -> Result<Snapshot> {
    let pairs: Vec<Vec<f64>> = serde_json::from_value(value).map_err(decode_error)?;

    pairs
        .into_iter()
        .enumerate()
        .map(|(index, pair)| match pair.as_slice() {
            // Trailing values (altitude, bearing) are ignored
            [latitude, longitude, ..] => Ok(GeoPoint::new(*latitude, *longitude)),
            _ => Err(FetchError::Decode {
                detail: format!(
                    "entry {index} has {} value(s), expected latitude and longitude",
                    pair.len()
                ),
            }),
        })
        .collect()
}

fn decode_error(error: serde_json::Error) -> FetchError {
    FetchError::Decode {
        detail: error.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Station identity types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// Stable numeric station identifier.
///
/// Identifiers are assigned once per graph build, ascending from 1 in
/// strict-key order, so the same inputs always produce the same ids.
///
/// # Examples
///
/// ```
/// use metro_server::domain::StationId;
///
/// let id: StationId = "7".parse().unwrap();
/// assert_eq!(id.get(), 7);
/// assert!("0".parse::<StationId>().is_err());
/// assert!("abc".parse::<StationId>().is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(u32);

impl StationId {
    /// Create an identifier from its raw value.
    pub const fn new(raw: u32) -> Self {
        StationId(raw)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position used for dense per-station tables.
    pub(crate) fn index(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }

    /// Identifier for a zero-based table position.
    pub(crate) fn from_index(index: usize) -> Self {
        StationId(index as u32 + 1)
    }
}

impl FromStr for StationId {
    type Err = InvalidStationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s.trim().parse().map_err(|_| InvalidStationId {
            reason: "must be a positive integer",
        })?;
        if raw == 0 {
            return Err(InvalidStationId {
                reason: "identifiers start at 1",
            });
        }
        Ok(StationId(raw))
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A station in the loaded network.
///
/// The display name is the first spelling encountered while loading and is
/// never changed afterwards. Coordinates may be back-filled later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    #[serde(rename = "station_id")]
    pub id: StationId,
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
}

impl Station {
    /// Create a station without coordinates.
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            coordinates: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert_eq!("1".parse::<StationId>().unwrap(), StationId::new(1));
        assert_eq!(" 42 ".parse::<StationId>().unwrap(), StationId::new(42));
    }

    #[test]
    fn reject_invalid_ids() {
        assert!("".parse::<StationId>().is_err());
        assert!("0".parse::<StationId>().is_err());
        assert!("-3".parse::<StationId>().is_err());
        assert!("1.5".parse::<StationId>().is_err());
    }

    #[test]
    fn index_roundtrip() {
        let id = StationId::new(5);
        assert_eq!(id.index(), 4);
        assert_eq!(StationId::from_index(4), id);
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::new(9);
        assert_eq!(id.to_string(), "9");
        assert_eq!(format!("{id:?}"), "StationId(9)");
    }

    #[test]
    fn station_serializes_flat() {
        let mut station = Station::new(StationId::new(3), "KLCC");
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["station_id"], 3);
        assert_eq!(json["name"], "KLCC");
        assert!(json.get("latitude").is_none());

        station.coordinates = Some(Coordinates {
            latitude: 3.1588,
            longitude: 101.7134,
        });
        let json = serde_json::to_value(&station).unwrap();
        assert_eq!(json["latitude"], 3.1588);
        assert_eq!(json["longitude"], 101.7134);
    }
}

//! Domain types for the metro network.
//!
//! Station identity, name normalization and route results. Every other
//! module compares station names only through [`StrictKey`] and
//! [`GroupKey`].

mod name_key;
mod route;
mod station;

pub use name_key::{GroupKey, StrictKey, group_key, is_interchange_pair, strict_key};
pub use route::{InvalidSearchMode, PathResult, SearchMode};
pub use station::{Coordinates, InvalidStationId, Station, StationId};

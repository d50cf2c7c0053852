//! Flat fare lookup.
//!
//! Fares share the station identity space but never take part in graph
//! traversal.

use std::collections::HashMap;

use crate::domain::StationId;

/// Map from (origin, destination) to price.
///
/// Directional: a fare from A to B says nothing about B to A.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FareTable {
    prices: HashMap<(StationId, StationId), f64>,
}

impl FareTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fare, replacing any existing price for the pair.
    pub fn insert(&mut self, origin: StationId, destination: StationId, price: f64) {
        self.prices.insert((origin, destination), price);
    }

    /// Look up the fare for a pair.
    pub fn get(&self, origin: StationId, destination: StationId) -> Option<f64> {
        self.prices.get(&(origin, destination)).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Station;

/// Home page: station picker, simulation controls and the live feed.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub stations: Vec<StationView>,
    pub track_edges: usize,
}

/// Station view model for templates.
#[derive(Debug, Clone)]
pub struct StationView {
    pub id: u32,
    pub name: String,
    pub has_coordinates: bool,
}

impl StationView {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.get(),
            name: station.name.clone(),
            has_coordinates: station.coordinates.is_some(),
        }
    }
}

impl IndexTemplate {
    pub fn new(stations: &[Station], track_edges: usize) -> Self {
        Self {
            stations: stations.iter().map(StationView::from_station).collect(),
            track_edges,
        }
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, StationId};

    #[test]
    fn renders_station_options() {
        let mut klcc = Station::new(StationId::new(1), "KLCC");
        klcc.coordinates = Some(Coordinates {
            latitude: 3.1579,
            longitude: 101.7123,
        });
        let stations = vec![klcc, Station::new(StationId::new(2), "Ampang Park")];

        let page = IndexTemplate::new(&stations, 2);
        assert_eq!(page.station_count(), 2);
        assert!(page.stations[0].has_coordinates);

        let html = page.render().unwrap();
        assert!(html.contains("KLCC"));
        assert!(html.contains("Ampang Park"));
    }
}

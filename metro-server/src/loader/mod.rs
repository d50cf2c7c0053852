//! Data directory loader.
//!
//! Reads the network tables from CSV files:
//!
//! - `Fare.csv`: fare matrix. Its row and column labels double as the
//!   station list.
//! - `Time.csv`: duration matrix, in minutes.
//! - `Route.csv`: one line per row, plain or `CODE [ A > B > C ]`.
//! - `stations_coords.csv`: optional `name, latitude, longitude`.
//!
//! Any of these may be absent; a missing file loads as an empty source.

mod coordinates;
mod error;
mod tables;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::network::{CoordinateRecord, NetworkSources};

pub use coordinates::{CoordinateFile, read_coordinates};
pub use error::LoaderError;
pub use tables::{parse_line, read_lines, read_matrix};

pub const FARE_FILE: &str = "Fare.csv";
pub const TIME_FILE: &str = "Time.csv";
pub const ROUTE_FILE: &str = "Route.csv";
pub const COORDINATE_FILE: &str = "stations_coords.csv";

/// Everything read from a data directory.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub sources: NetworkSources,
    pub coordinates: Vec<CoordinateRecord>,
}

/// Loads network sources from a directory.
#[derive(Debug, Clone)]
pub struct DataLoader {
    root: PathBuf,
}

impl DataLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load network sources and coordinates.
    pub fn load(&self) -> Result<LoadedData, LoaderError> {
        let sources = self.load_sources()?;
        let coordinates = self.load_coordinates()?;
        Ok(LoadedData {
            sources,
            coordinates,
        })
    }

    /// Load the fare, duration and route tables.
    pub fn load_sources(&self) -> Result<NetworkSources, LoaderError> {
        let fares = self.read(FARE_FILE, read_matrix)?.unwrap_or_default();
        let durations = self.read(TIME_FILE, read_matrix)?.unwrap_or_default();
        let lines = self.read(ROUTE_FILE, read_lines)?.unwrap_or_default();
        let stations: Vec<String> = fares.labels().map(String::from).collect();

        info!(
            root = %self.root.display(),
            stations = stations.len(),
            lines = lines.len(),
            fare_rows = fares.rows().len(),
            duration_rows = durations.rows().len(),
            "Loaded network sources"
        );

        Ok(NetworkSources {
            stations,
            lines,
            durations,
            fares,
        })
    }

    /// Load station coordinates, if the file exists.
    pub fn load_coordinates(&self) -> Result<Vec<CoordinateRecord>, LoaderError> {
        let Some(file) = self.read(COORDINATE_FILE, read_coordinates)? else {
            return Ok(Vec::new());
        };
        if file.skipped > 0 {
            warn!(skipped = file.skipped, "Skipped unusable coordinate rows");
        }
        Ok(file.records)
    }

    /// Open and parse one file. `Ok(None)` when it does not exist.
    fn read<T>(
        &self,
        name: &str,
        parse: impl FnOnce(BufReader<File>) -> Result<T, csv::Error>,
    ) -> Result<Option<T>, LoaderError> {
        let path = self.root.join(name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Data file not found, skipping");
                return Ok(None);
            }
            Err(source) => return Err(LoaderError::Io { path, source }),
        };

        parse(BufReader::new(file))
            .map(Some)
            .map_err(|source| LoaderError::Csv { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::GraphBuilder;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn loads_full_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), FARE_FILE, "\u{feff},KLCC,Ampang Park\nKLCC,0,1.20\nAmpang Park,1.20,0\n");
        write(dir.path(), TIME_FILE, ",KLCC,Ampang Park\nKLCC,,2\nAmpang Park,2,\n");
        write(dir.path(), ROUTE_FILE, "KJL [ KLCC > Ampang Park ]\n");
        write(
            dir.path(),
            COORDINATE_FILE,
            "name,latitude,longitude\nKLCC,3.1579,101.7123\nNowhere,1,1\n",
        );

        let data = DataLoader::new(dir.path()).load().unwrap();
        assert_eq!(data.sources.stations, vec!["KLCC", "Ampang Park", "KLCC", "Ampang Park"]);
        assert_eq!(data.sources.lines, vec![vec!["KLCC".to_string(), "Ampang Park".into()]]);
        assert_eq!(data.coordinates.len(), 2);

        let mut graph = GraphBuilder::default().build(&data.sources);
        assert_eq!(graph.station_count(), 2);
        let klcc = graph.resolve("klcc").unwrap();
        let ampang = graph.resolve("Ampang Park").unwrap();
        assert_eq!(graph.edge_weight(klcc, ampang), Some(2.0));
        assert_eq!(graph.fare(klcc, ampang), Some(1.2));

        let report = graph.apply_coordinates(&data.coordinates);
        assert_eq!(report.updated, 1);
        assert_eq!(report.unmatched, 1);
        assert!(graph.station(klcc).unwrap().coordinates.is_some());
    }

    #[test]
    fn missing_files_are_empty_sources() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataLoader::new(dir.path()).load().unwrap();
        assert!(data.sources.stations.is_empty());
        assert!(data.sources.lines.is_empty());
        assert!(data.sources.fares.is_empty());
        assert!(data.coordinates.is_empty());
    }

    #[test]
    fn stations_from_routes_when_fares_absent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ROUTE_FILE, "A,B,C\n");

        let data = DataLoader::new(dir.path()).load_sources().unwrap();
        let graph = GraphBuilder::default().build(&data);
        assert_eq!(graph.station_count(), 3);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn unreadable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(TIME_FILE)).unwrap();

        let err = DataLoader::new(dir.path()).load_sources().unwrap_err();
        assert!(err.to_string().contains(TIME_FILE));
    }
}

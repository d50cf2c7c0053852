//! Station coordinate file.

use std::io;

use crate::domain::Coordinates;
use crate::network::CoordinateRecord;

use super::tables::read_records;

/// Records read from a coordinate file, plus rows that were unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateFile {
    pub records: Vec<CoordinateRecord>,
    pub skipped: usize,
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Find a column by exact normalised name, then by substring.
fn find_column(header: &[String], wanted: &str) -> Option<usize> {
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    normalized
        .iter()
        .position(|h| h == wanted)
        .or_else(|| normalized.iter().position(|h| h.contains(wanted)))
}

/// Read `name, latitude, longitude` rows.
///
/// Columns are found by header name, case-insensitively. Rows with a blank
/// name or a non-numeric coordinate are skipped. A file without the three
/// columns yields nothing.
pub fn read_coordinates<R: io::Read>(input: R) -> Result<CoordinateFile, csv::Error> {
    let mut rows = read_records(input)?.into_iter();
    let Some(header) = rows.next() else {
        return Ok(CoordinateFile::default());
    };
    let (Some(name), Some(lat), Some(lng)) = (
        find_column(&header, "name"),
        find_column(&header, "latitude"),
        find_column(&header, "longitude"),
    ) else {
        return Ok(CoordinateFile::default());
    };

    let mut file = CoordinateFile::default();
    for row in rows {
        let field = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or_default();
        let parsed = (
            field(lat).parse::<f64>(),
            field(lng).parse::<f64>(),
        );
        match (field(name), parsed) {
            (name, (Ok(latitude), Ok(longitude)))
                if !name.is_empty() && latitude.is_finite() && longitude.is_finite() =>
            {
                file.records.push(CoordinateRecord {
                    name: name.to_string(),
                    coordinates: Coordinates {
                        latitude,
                        longitude,
                    },
                });
            }
            _ => file.skipped += 1,
        }
    }
    Ok(file)
}

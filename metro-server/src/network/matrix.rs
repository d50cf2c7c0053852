//! Pairwise station matrices (durations, fares).
//!
//! A matrix arrives as a header row of destination labels (the first cell
//! is a corner label and is ignored) followed by rows whose first cell is
//! the origin label. Cells are kept raw and parsed on demand so that a bad
//! cell costs one entry, never the whole import.

use std::sync::LazyLock;

use regex::Regex;

/// First numeric token in a cell such as `"RM 2.50"`.
static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("static regex is valid")
});

/// Markers that mean "no value" in the source spreadsheets.
const MISSING_MARKERS: [&str; 3] = ["-", "na", "n/a"];

/// A parsed matrix cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Blank or an explicit no-value marker.
    Missing,
    /// A finite number.
    Value(f64),
    /// Non-empty text with no usable number in it.
    Invalid,
}

impl Cell {
    /// Parse a raw cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use metro_server::network::Cell;
    ///
    /// assert_eq!(Cell::parse(" 4.5 "), Cell::Value(4.5));
    /// assert_eq!(Cell::parse("1,200"), Cell::Value(1200.0));
    /// assert_eq!(Cell::parse("RM 2.10"), Cell::Value(2.1));
    /// assert_eq!(Cell::parse("N/A"), Cell::Missing);
    /// assert_eq!(Cell::parse("closed"), Cell::Invalid);
    /// ```
    pub fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
            return Cell::Missing;
        }

        let without_separators = trimmed.replace(',', "");
        if let Ok(v) = without_separators.parse::<f64>() {
            return finite_or_invalid(v);
        }

        NUMERIC_TOKEN
            .find(&without_separators)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map_or(Cell::Invalid, finite_or_invalid)
    }

    /// Returns the value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Missing | Cell::Invalid => None,
        }
    }
}

fn finite_or_invalid(v: f64) -> Cell {
    if v.is_finite() { Cell::Value(v) } else { Cell::Invalid }
}

/// One origin row of a matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// A `(row_label, column_label) -> cell` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    column_labels: Vec<String>,
    rows: Vec<MatrixRow>,
}

/// A parsed, non-missing entry of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixEntry<'a> {
    pub row: &'a str,
    pub column: &'a str,
    pub cell: Cell,
}

impl Matrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matrix from a header record and data records.
    ///
    /// `header[0]` is the corner cell; `header[j]` labels column `j` of
    /// every row, whose own first cell is the row label. Rows with a blank
    /// label are dropped.
    pub fn from_records(header: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let column_labels = header
            .into_iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .collect();

        let rows = records
            .into_iter()
            .filter_map(|record| {
                let mut cells = record.into_iter();
                let label = cells.next()?.trim().to_string();
                if label.is_empty() {
                    return None;
                }
                Some(MatrixRow {
                    label,
                    cells: cells.collect(),
                })
            })
            .collect();

        Self {
            column_labels,
            rows,
        }
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.column_labels.iter().all(|l| l.is_empty())
    }

    /// Every non-blank row and column label, rows first, in source order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(|r| r.label.as_str())
            .chain(self.column_labels.iter().map(String::as_str))
            .filter(|l| !l.is_empty())
    }

    /// Every cell that is not blank or a no-value marker.
    ///
    /// Invalid cells are included (as [`Cell::Invalid`]) so callers can
    /// count them. Cells under a blank column label, or beyond the header,
    /// are ignored.
    pub fn entries(&self) -> impl Iterator<Item = MatrixEntry<'_>> {
        self.rows.iter().flat_map(move |row| {
            row.cells
                .iter()
                .zip(self.column_labels.iter())
                .filter(|(_, column)| !column.is_empty())
                .filter_map(move |(raw, column)| {
                    let cell = Cell::parse(raw);
                    (cell != Cell::Missing).then_some(MatrixEntry {
                        row: row.label.as_str(),
                        column: column.as_str(),
                        cell,
                    })
                })
        })
    }
}

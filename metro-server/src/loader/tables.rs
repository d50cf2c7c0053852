//! CSV readers for the network tables.

use std::io;
use std::sync::LazyLock;

use regex::Regex;

use crate::network::Matrix;

/// The bracketed stop list in `KJL [ Gombak > Taman Melati > ... ]`.
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?)\]").expect("static regex is valid"));

const BOM: char = '\u{feff}';

fn reader<R: io::Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input)
}

fn strip_bom(field: &str) -> &str {
    field.trim_start_matches(BOM)
}

/// Read all records as owned strings, BOM removed from the first field.
pub(super) fn read_records<R: io::Read>(input: R) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut records = Vec::new();
    for (index, record) in reader(input).records().enumerate() {
        let record = record?;
        let fields = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                if index == 0 && col == 0 {
                    strip_bom(field).to_string()
                } else {
                    field.to_string()
                }
            })
            .collect();
        records.push(fields);
    }
    Ok(records)
}

/// Read a labelled matrix: the first row holds column labels, the first
/// column row labels.
pub fn read_matrix<R: io::Read>(input: R) -> Result<Matrix, csv::Error> {
    let mut records = read_records(input)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Matrix::new());
    };
    Ok(Matrix::from_records(header, records.collect()))
}

/// Read one line per row. Rows with fewer than two stops are skipped.
pub fn read_lines<R: io::Read>(input: R) -> Result<Vec<Vec<String>>, csv::Error> {
    Ok(read_records(input)?
        .iter()
        .map(|row| parse_line(row))
        .filter(|stops| stops.len() >= 2)
        .collect())
}

/// Parse a route row.
///
/// Accepts a plain list of names, one per field, or the bracket form
/// `CODE [ A > B > C ]` anywhere in the row.
pub fn parse_line<S: AsRef<str>>(fields: &[S]) -> Vec<String> {
    let text = fields
        .iter()
        .map(|f| f.as_ref())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(inner) = BRACKETED.captures(&text).and_then(|c| c.get(1))
        && inner.as_str().contains('>')
    {
        return inner
            .as_str()
            .split('>')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    fields
        .iter()
        .map(|f| f.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_row() {
        assert_eq!(
            parse_line(&["Gombak", " Taman Melati ", "", "Wangsa Maju"]),
            vec!["Gombak", "Taman Melati", "Wangsa Maju"]
        );
    }

    #[test]
    fn bracket_row() {
        assert_eq!(
            parse_line(&["KJL [ Gombak > Taman Melati >  > KLCC ]"]),
            vec!["Gombak", "Taman Melati", "KLCC"]
        );
    }

    #[test]
    fn brackets_without_arrows_are_plain() {
        assert_eq!(parse_line(&["[A]", "B"]), vec!["[A]", "B"]);
    }

    #[test]
    fn lines_skip_short_rows() {
        let csv = "A,B,C\nD\n\nKJL [ X > Y ]\n";
        let lines = read_lines(csv.as_bytes()).unwrap();
        assert_eq!(
            lines,
            vec![
                vec!["A".to_string(), "B".into(), "C".into()],
                vec!["X".to_string(), "Y".into()],
            ]
        );
    }

    #[test]
    fn matrix_with_bom_and_markers() {
        let csv = "\u{feff},A,B\nA,,2.5\nB,NA,-\n";
        let matrix = read_matrix(csv.as_bytes()).unwrap();
        assert_eq!(matrix.column_labels(), ["A".to_string(), "B".to_string()]);

        let entries: Vec<_> = matrix
            .entries()
            .map(|e| (e.row.to_string(), e.column.to_string(), e.cell.value()))
            .collect();
        assert_eq!(entries, vec![("A".to_string(), "B".to_string(), Some(2.5))]);
    }

    #[test]
    fn bom_stripped_from_first_label() {
        let csv = "\u{feff}KLCC,Ampang Park\n";
        let lines = read_lines(csv.as_bytes()).unwrap();
        assert_eq!(lines[0][0], "KLCC");
    }

    #[test]
    fn empty_input_is_empty_matrix() {
        assert!(read_matrix("".as_bytes()).unwrap().is_empty());
    }
}

//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::{ColumnSelector, CsvReadOptions};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read the selected column of a CSV file as x values
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Vec<f64>> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read the selected column from a reader as x values
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Vec<f64>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let column = match &options.column {
            ColumnSelector::Index(index) => *index,
            ColumnSelector::Name(name) => {
                if !options.has_header {
                    return Err(CsvError::MissingColumn(name.clone()));
                }
                csv_reader
                    .headers()?
                    .iter()
                    .position(|header| header.trim().eq_ignore_ascii_case(name))
                    .ok_or_else(|| CsvError::MissingColumn(name.clone()))?
            }
        };

        let first_row = if options.has_header { 2 } else { 1 };
        let mut values = Vec::new();
        let mut skipped = 0usize;

        for (i, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = first_row + i;

            let field = match record.get(column) {
                Some(field) => field.trim(),
                None if options.skip_empty => {
                    skipped += 1;
                    continue;
                }
                None => {
                    return Err(CsvError::Parse {
                        row,
                        column,
                        message: format!("row has only {} fields", record.len()),
                    })
                }
            };

            if field.is_empty() {
                if options.skip_empty {
                    skipped += 1;
                    continue;
                }
                return Err(CsvError::Parse {
                    row,
                    column,
                    message: "empty field".to_string(),
                });
            }

            values.push(Self::parse_value(field).ok_or_else(|| CsvError::Parse {
                row,
                column,
                message: format!("not a number: '{}'", field),
            })?);
        }

        tracing::debug!(values = values.len(), skipped, column, "read x values");
        Ok(values)
    }

    /// Parse a number, accepting a decimal comma
    fn parse_value(field: &str) -> Option<f64> {
        field
            .parse::<f64>()
            .ok()
            .or_else(|| field.replace(',', ".").parse::<f64>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_first_column() {
        let data = "0\n0.5\n-1.25\n";
        let values = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(values, vec![0.0, 0.5, -1.25]);
    }

    #[test]
    fn test_read_by_index_with_header() {
        let data = "label,x\na,1\nb,2\n";
        let options = CsvReadOptions {
            has_header: true,
            column: ColumnSelector::Index(1),
            ..Default::default()
        };
        assert_eq!(CsvReader::read(data.as_bytes(), &options).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_read_by_name() {
        let data = "t;X\n1;\"2,5\"\n2;3\n";
        let options = CsvReadOptions {
            delimiter: b';',
            has_header: true,
            column: ColumnSelector::Name("x".into()),
            ..Default::default()
        };
        assert_eq!(CsvReader::read(data.as_bytes(), &options).unwrap(), vec![2.5, 3.0]);

        let missing = CsvReadOptions {
            column: ColumnSelector::Name("y".into()),
            ..options
        };
        assert!(matches!(
            CsvReader::read(data.as_bytes(), &missing),
            Err(CsvError::MissingColumn(name)) if name == "y"
        ));
    }

    #[test]
    fn test_read_skips_empty() {
        let data = "1\n\n 2 \n";
        let values = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_read_parse_error() {
        let data = "x\n1\nabc\n";
        let options = CsvReadOptions {
            has_header: true,
            ..Default::default()
        };
        match CsvReader::read(data.as_bytes(), &options) {
            Err(CsvError::Parse { row, column, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(column, 0);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xs.csv");
        std::fs::write(&path, "1\n2\n3\n").unwrap();
        let values = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}

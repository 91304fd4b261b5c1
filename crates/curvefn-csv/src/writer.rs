//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator, NonFinite};

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write `x,y` rows to a CSV file
    pub fn write_points_file<P, I>(points: I, path: P, options: &CsvWriteOptions) -> CsvResult<usize>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (f64, f64)>,
    {
        let file = File::create(path)?;
        Self::write_points(points, file, options)
    }

    /// Write `x,y` rows to a writer
    ///
    /// Returns the number of data rows written.
    pub fn write_points<W, I>(points: I, writer: W, options: &CsvWriteOptions) -> CsvResult<usize>
    where
        W: Write,
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut csv_writer = Self::builder(options).from_writer(writer);
        if options.write_header {
            csv_writer.write_record(["x", "y"])?;
        }

        let mut rows = 0;
        for (x, y) in points {
            if let Some(record) = Self::format_record(&[x, y], options) {
                csv_writer.write_record(&record)?;
                rows += 1;
            }
        }

        csv_writer.flush()?;
        tracing::debug!(rows, "wrote points");
        Ok(rows)
    }

    /// Write `segment,x,y` rows to a CSV file
    pub fn write_segments_file<P, I, S>(
        segments: I,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<usize>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = (f64, f64)>,
    {
        let file = File::create(path)?;
        Self::write_segments(segments, file, options)
    }

    /// Write `segment,x,y` rows to a writer, numbering segments from 0
    pub fn write_segments<W, I, S>(segments: I, writer: W, options: &CsvWriteOptions) -> CsvResult<usize>
    where
        W: Write,
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = (f64, f64)>,
    {
        let mut csv_writer = Self::builder(options).from_writer(writer);
        if options.write_header {
            csv_writer.write_record(["segment", "x", "y"])?;
        }

        let mut rows = 0;
        for (index, segment) in segments.into_iter().enumerate() {
            for (x, y) in segment {
                if let Some(fields) = Self::format_record(&[x, y], options) {
                    let mut record = Vec::with_capacity(3);
                    record.push(index.to_string());
                    record.extend(fields);
                    csv_writer.write_record(&record)?;
                    rows += 1;
                }
            }
        }

        csv_writer.flush()?;
        tracing::debug!(rows, "wrote segments");
        Ok(rows)
    }

    /// Write one value per row to a CSV file
    pub fn write_values_file<P, I>(values: I, path: P, options: &CsvWriteOptions) -> CsvResult<usize>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = f64>,
    {
        let file = File::create(path)?;
        Self::write_values(values, file, options)
    }

    /// Write one value per row to a writer
    pub fn write_values<W, I>(values: I, writer: W, options: &CsvWriteOptions) -> CsvResult<usize>
    where
        W: Write,
        I: IntoIterator<Item = f64>,
    {
        let mut csv_writer = Self::builder(options).from_writer(writer);
        if options.write_header {
            csv_writer.write_record(["value"])?;
        }

        let mut rows = 0;
        for value in values {
            if let Some(record) = Self::format_record(&[value], options) {
                csv_writer.write_record(&record)?;
                rows += 1;
            }
        }

        csv_writer.flush()?;
        tracing::debug!(rows, "wrote values");
        Ok(rows)
    }

    fn builder(options: &CsvWriteOptions) -> csv::WriterBuilder {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
            LineTerminator::CR => csv::Terminator::Any(b'\r'),
        };

        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator);
        builder
    }

    /// Format a row of numbers, or `None` if the row is to be skipped
    fn format_record(values: &[f64], options: &CsvWriteOptions) -> Option<Vec<String>> {
        if options.non_finite == NonFinite::Skip && values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(values.iter().map(|&v| Self::format_value(v, options)).collect())
    }

    fn format_value(value: f64, options: &CsvWriteOptions) -> String {
        if !value.is_finite() {
            return match options.non_finite {
                NonFinite::Empty => String::new(),
                _ if value.is_nan() => "NaN".to_string(),
                _ if value > 0.0 => "inf".to_string(),
                _ => "-inf".to_string(),
            };
        }

        match options.precision {
            Some(precision) => format!("{:.*}", precision, value),
            None => value.to_string(),
        }
    }
}

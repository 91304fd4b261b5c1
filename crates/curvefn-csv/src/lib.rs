//! # curvefn-csv
//!
//! CSV reader and writer for curvefn.
//!
//! Reads a column of x values to evaluate at, and writes sampled curves
//! (`x,y` rows), segmented curves (`segment,x,y` rows) and lookup tables
//! (one value per row).

mod reader;
mod writer;
mod options;
mod error;

pub use reader::CsvReader;
pub use writer::CsvWriter;
pub use options::{ColumnSelector, CsvReadOptions, CsvWriteOptions, LineTerminator, NonFinite};
pub use error::{CsvError, CsvResult};

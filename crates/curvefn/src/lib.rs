//! # curvefn
//!
//! Compile single-variable math expressions once, then evaluate and sample
//! them as curves.
//!
//! ## Features
//!
//! - Forgiving expression syntax: implicit multiplication, `²`/`³`,
//!   decimal comma, case-insensitive names
//! - Non-fatal diagnostics instead of parse failures
//! - Selectable numeric policies for `sqrt` and `log`
//! - Grid, adaptive and discontinuity-aware sampling
//! - Lookup tables with linear read-back
//! - CSV import/export (`csv` feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use curvefn::prelude::*;
//!
//! let f = compile("3sin(x) + x²");
//! assert_eq!(f.evaluate(0.0), 0.0);
//!
//! let segments = f.segment(&SegmentOptions::default()).unwrap();
//! assert_eq!(segments.len(), 1);
//!
//! // Write the curve as CSV
//! let mut out = Vec::new();
//! segments.write_csv(&mut out, &CsvWriteOptions::default()).unwrap();
//! ```

pub mod equation;
pub mod occupancy;
pub mod prelude;
pub mod sampling;

pub use equation::EquationBuilder;
pub use occupancy::{Occupancy, Transition};
pub use sampling::{
    build_lut, sample, sample_adaptive, segment, CurveSegment, ExpressionSamplingExt, Lut,
    LutOptions, NearZeroGuard, SampleGrid, SampleOptions, SamplePoint, SampleSet, SamplingError,
    SamplingResult, SamplingStats, SegmentOptions, SegmentSet,
};

// Re-export expression types
pub use curvefn_expr::{
    compile, compile_with_policy, evaluate, parse_strict, BinaryOperator, CompiledExpression,
    Diagnostic, DiagnosticKind, DiagnosticSink, Expr, ExprError, ExprResult, LogBase,
    MathFunction, NumericPolicy, Severity, SqrtDomain,
};

// Re-export I/O types
#[cfg(feature = "csv")]
pub use curvefn_csv::{
    ColumnSelector, CsvError, CsvReadOptions, CsvReader, CsvResult, CsvWriteOptions, CsvWriter,
    LineTerminator, NonFinite,
};

#[cfg(feature = "csv")]
use std::io::Write;
#[cfg(feature = "csv")]
use std::path::Path;

/// Extension trait for sampling results to add CSV output
///
/// Returns the number of data rows written.
#[cfg(feature = "csv")]
pub trait CurveCsvExt {
    /// Write as CSV to a writer
    fn write_csv<W: Write>(&self, writer: W, options: &CsvWriteOptions) -> CsvResult<usize>;

    /// Write as CSV to a file
    fn save_csv<P: AsRef<Path>>(&self, path: P, options: &CsvWriteOptions) -> CsvResult<usize>;
}

#[cfg(feature = "csv")]
impl CurveCsvExt for SampleSet {
    fn write_csv<W: Write>(&self, writer: W, options: &CsvWriteOptions) -> CsvResult<usize> {
        CsvWriter::write_points(self.coords(), writer, options)
    }

    fn save_csv<P: AsRef<Path>>(&self, path: P, options: &CsvWriteOptions) -> CsvResult<usize> {
        CsvWriter::write_points_file(self.coords(), path, options)
    }
}

#[cfg(feature = "csv")]
impl CurveCsvExt for SegmentSet {
    fn write_csv<W: Write>(&self, writer: W, options: &CsvWriteOptions) -> CsvResult<usize> {
        CsvWriter::write_segments(self.iter().map(CurveSegment::coords), writer, options)
    }

    fn save_csv<P: AsRef<Path>>(&self, path: P, options: &CsvWriteOptions) -> CsvResult<usize> {
        CsvWriter::write_segments_file(self.iter().map(CurveSegment::coords), path, options)
    }
}

#[cfg(feature = "csv")]
impl CurveCsvExt for Lut {
    fn write_csv<W: Write>(&self, writer: W, options: &CsvWriteOptions) -> CsvResult<usize> {
        CsvWriter::write_values(self.values().iter().map(|&v| f64::from(v)), writer, options)
    }

    fn save_csv<P: AsRef<Path>>(&self, path: P, options: &CsvWriteOptions) -> CsvResult<usize> {
        CsvWriter::write_values_file(self.values().iter().map(|&v| f64::from(v)), path, options)
    }
}

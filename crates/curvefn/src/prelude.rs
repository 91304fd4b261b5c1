//! Prelude module - common imports for curvefn users
//!
//! ```rust
//! use curvefn::prelude::*;
//! ```

pub use crate::{
    // Expression types
    compile,
    compile_with_policy,
    CompiledExpression,
    Diagnostic,
    DiagnosticKind,
    NumericPolicy,

    // Sampling types
    CurveSegment,
    ExpressionSamplingExt,
    Lut,
    LutOptions,
    NearZeroGuard,
    SampleGrid,
    SampleOptions,
    SampleSet,
    SegmentOptions,
    SegmentSet,

    // Composition and tracking
    EquationBuilder,
    Occupancy,
    Transition,
};

#[cfg(feature = "csv")]
pub use crate::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, CurveCsvExt};

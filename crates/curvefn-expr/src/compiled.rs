//! Compiled expressions
//!
//! A [`CompiledExpression`] is parsed once per source change and then
//! evaluated any number of times. Compilation never fails: malformed input
//! produces a degenerate-but-usable expression plus diagnostics.

use crate::ast::Expr;
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::evaluator::evaluate_expr;
use crate::parser::{normalize, parse_normalized};
use crate::policy::NumericPolicy;
use std::fmt;

/// Compile `source` with the strict numeric policy
///
/// # Example
/// ```rust
/// use curvefn_expr::compile;
///
/// let f = compile("3sin(x)");
/// assert_eq!(f.source(), "3sin(x)");
/// assert_eq!(f.evaluate(0.0), 0.0);
///
/// // Bad input still compiles
/// let g = compile("sin(");
/// assert!(!g.is_well_formed());
/// assert_eq!(g.evaluate(1.0), 0.0);
/// ```
pub fn compile(source: &str) -> CompiledExpression {
    CompiledExpression::new(source, NumericPolicy::default())
}

/// Compile `source` with an explicit numeric policy
pub fn compile_with_policy(source: &str, policy: NumericPolicy) -> CompiledExpression {
    CompiledExpression::new(source, policy)
}

/// A parsed, reusable function of `x`
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    root: Expr,
    policy: NumericPolicy,
    diagnostics: Vec<Diagnostic>,
    /// Set when an error-level diagnostic was found; evaluation yields 0
    degenerate: bool,
}

impl CompiledExpression {
    /// Compile, logging diagnostics through `tracing`
    pub fn new(source: &str, policy: NumericPolicy) -> Self {
        Self::build(source, policy, None)
    }

    /// Compile, additionally handing each diagnostic to `sink`
    pub fn compile_with_sink(
        source: &str,
        policy: NumericPolicy,
        sink: &mut dyn DiagnosticSink,
    ) -> Self {
        Self::build(source, policy, Some(sink))
    }

    fn build(source: &str, policy: NumericPolicy, sink: Option<&mut dyn DiagnosticSink>) -> Self {
        let source = normalize(source);
        let outcome = parse_normalized(&source);
        let degenerate = outcome.is_degenerate();

        for diagnostic in &outcome.diagnostics {
            diagnostic.emit(&source);
        }
        if let Some(sink) = sink {
            for diagnostic in &outcome.diagnostics {
                sink.report(diagnostic);
            }
        }

        tracing::trace!(
            source = %source,
            nodes = outcome.root.node_count(),
            diagnostics = outcome.diagnostics.len(),
            "compiled expression"
        );

        Self {
            source,
            root: outcome.root,
            policy,
            diagnostics: outcome.diagnostics,
            degenerate,
        }
    }

    /// Evaluate at `x`
    ///
    /// Pure: the same `x` always gives the bit-identical result.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        if self.degenerate {
            return 0.0;
        }
        evaluate_expr(&self.root, x, &self.policy)
    }

    /// Evaluate at every `x` in `xs`
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Evaluate at every `x` in `xs`, writing into `out`
    ///
    /// Only `min(xs.len(), out.len())` slots are written.
    pub fn evaluate_into(&self, xs: &[f64], out: &mut [f64]) {
        for (slot, &x) in out.iter_mut().zip(xs) {
            *slot = self.evaluate(x);
        }
    }

    /// Normalized source text (lowercase, no whitespace)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed tree
    pub fn ast(&self) -> &Expr {
        &self.root
    }

    pub fn policy(&self) -> NumericPolicy {
        self.policy
    }

    /// Same tree, different numeric policy
    pub fn with_policy(&self, policy: NumericPolicy) -> Self {
        Self {
            policy,
            ..self.clone()
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// No diagnostics at all
    pub fn is_well_formed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Evaluation always yields 0 because of an error-level diagnostic
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// True if the result can change with `x`
    pub fn depends_on_x(&self) -> bool {
        !self.degenerate && self.root.depends_on_x()
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for CompiledExpression {
    fn from(source: &str) -> Self {
        compile(source)
    }
}

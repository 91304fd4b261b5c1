//! Parse diagnostics
//!
//! Syntax anomalies never abort compilation. Each one becomes a
//! [`Diagnostic`] that is logged through `tracing`, stored on the compiled
//! expression and handed to an optional [`DiagnosticSink`].

use std::fmt;

/// Category of a syntax anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A factor was expected but some other character was found
    UnexpectedCharacter,
    /// A name followed by `(` that is not a registered function
    UnknownFunction,
    /// A name that is not followed by `(`
    MissingFunctionArgument,
    /// `(` without its matching `)`
    UnclosedParenthesis,
    /// Input left over after the top-level expression
    TrailingInput,
    /// A numeric literal that could not be converted
    InvalidNumber,
    /// Nothing to parse
    EmptyExpression,
    /// Source too long or nested too deeply to parse safely
    LimitExceeded,
}

impl DiagnosticKind {
    /// Severity attached to this kind of anomaly
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::InvalidNumber | DiagnosticKind::LimitExceeded => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Stable snake_case name, used as a structured log field
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnexpectedCharacter => "unexpected_character",
            DiagnosticKind::UnknownFunction => "unknown_function",
            DiagnosticKind::MissingFunctionArgument => "missing_function_argument",
            DiagnosticKind::UnclosedParenthesis => "unclosed_parenthesis",
            DiagnosticKind::TrailingInput => "trailing_input",
            DiagnosticKind::InvalidNumber => "invalid_number",
            DiagnosticKind::EmptyExpression => "empty_expression",
            DiagnosticKind::LimitExceeded => "limit_exceeded",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How bad a diagnostic is
///
/// Warnings leave a usable partial expression behind. Errors make the whole
/// expression degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single syntax anomaly found while compiling
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Character offset into the normalized source
    pub position: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            position,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Log this diagnostic through `tracing`
    pub(crate) fn emit(&self, source: &str) {
        match self.severity {
            Severity::Warning => tracing::warn!(
                kind = self.kind.as_str(),
                position = self.position,
                source,
                "{}",
                self.message
            ),
            Severity::Error => tracing::error!(
                kind = self.kind.as_str(),
                position = self.position,
                source,
                "{}",
                self.message
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] at {}: {}",
            self.severity, self.kind, self.position, self.message
        )
    }
}

/// Receiver for diagnostics produced during compilation
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&Diagnostic),
{
    fn report(&mut self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

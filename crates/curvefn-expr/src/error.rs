//! Expression error types

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use thiserror::Error;

/// Result type for checked expression operations
pub type ExprResult<T> = std::result::Result<T, ExprError>;

/// Errors reported by the checked parsing surface.
///
/// The regular [`compile`](crate::compile) path never returns these; it
/// degrades to a partial expression and records diagnostics instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Syntax anomaly at a character offset of the normalized source
    #[error("Syntax error at {position}: {message}")]
    Syntax {
        kind: DiagnosticKind,
        position: usize,
        message: String,
    },
}

impl From<Diagnostic> for ExprError {
    fn from(diagnostic: Diagnostic) -> Self {
        ExprError::Syntax {
            kind: diagnostic.kind,
            position: diagnostic.position,
            message: diagnostic.message,
        }
    }
}

impl ExprError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ExprError::Syntax { kind, .. } => *kind,
        }
    }
}

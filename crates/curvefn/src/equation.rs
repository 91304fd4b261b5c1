//! Equation composition
//!
//! Builds an expression out of fragments collected one at a time (for
//! example from pickups in a game level). Signed fragments extend the sum,
//! anything else multiplies what is already there.

use crate::{compile, compile_with_policy, CompiledExpression, NumericPolicy};
use std::fmt;

/// Accumulates expression fragments
///
/// # Example
///
/// ```rust
/// use curvefn::EquationBuilder;
///
/// let mut builder = EquationBuilder::new();
/// builder.append("sin(x)").append("2").append("+1");
/// assert_eq!(builder.as_str(), "sin(x)*2+1");
/// assert_eq!(builder.compile().evaluate(0.0), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquationBuilder {
    equation: String,
}

impl EquationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment
    ///
    /// - starting with `+` or `-`: appended verbatim
    /// - first fragment: becomes the equation
    /// - otherwise: appended as `*fragment`
    pub fn append(&mut self, fragment: &str) -> &mut Self {
        if fragment.starts_with('+') || fragment.starts_with('-') {
            self.equation.push_str(fragment);
        } else if self.equation.is_empty() {
            self.equation.push_str(fragment);
        } else {
            self.equation.push('*');
            self.equation.push_str(fragment);
        }

        tracing::debug!(fragment, equation = %self.equation, "appended to equation");
        self
    }

    pub fn as_str(&self) -> &str {
        &self.equation
    }

    pub fn is_empty(&self) -> bool {
        self.equation.is_empty()
    }

    pub fn clear(&mut self) {
        self.equation.clear();
    }

    /// Compile the current equation with the strict policy
    pub fn compile(&self) -> CompiledExpression {
        compile(&self.equation)
    }

    pub fn compile_with_policy(&self, policy: NumericPolicy) -> CompiledExpression {
        compile_with_policy(&self.equation, policy)
    }
}

impl fmt::Display for EquationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.equation)
    }
}

impl<S: AsRef<str>> Extend<S> for EquationBuilder {
    fn extend<I: IntoIterator<Item = S>>(&mut self, fragments: I) {
        for fragment in fragments {
            self.append(fragment.as_ref());
        }
    }
}

//! Expression evaluator
//!
//! Walks a parsed [`Expr`] for a given `x`. Evaluation is allocation-free and
//! reads nothing but its arguments, so a compiled expression can be shared
//! freely between threads.

use crate::ast::Expr;
use crate::compiled::CompiledExpression;
use crate::policy::NumericPolicy;

/// Evaluate a compiled expression at `x`
///
/// Undefined points come back as NaN or ±infinity, never as a panic.
///
/// # Example
/// ```rust
/// use curvefn_expr::{compile, evaluate};
///
/// let f = compile("x^2+3*x");
/// assert_eq!(evaluate(&f, 2.0), 10.0);
/// assert_eq!(evaluate(&compile("1/x"), 0.0), f64::INFINITY);
/// ```
#[inline]
pub fn evaluate(compiled: &CompiledExpression, x: f64) -> f64 {
    compiled.evaluate(x)
}

/// Evaluate a bare expression tree at `x` under `policy`
pub fn evaluate_expr(expr: &Expr, x: f64, policy: &NumericPolicy) -> f64 {
    match expr {
        Expr::Number(n) => *n,
        Expr::Variable => x,
        Expr::Missing => 0.0,
        Expr::Negate(inner) => -evaluate_expr(inner, x, policy),
        Expr::BinaryOp { op, left, right } => {
            let left = evaluate_expr(left, x, policy);
            let right = evaluate_expr(right, x, policy);
            op.apply(left, right)
        }
        Expr::Square(inner) => {
            let v = evaluate_expr(inner, x, policy);
            v * v
        }
        Expr::Cube(inner) => {
            let v = evaluate_expr(inner, x, policy);
            v * v * v
        }
        Expr::Function { function, arg } => function.apply(evaluate_expr(arg, x, policy), policy),
        Expr::UnknownFunction { .. } => 0.0,
    }
}

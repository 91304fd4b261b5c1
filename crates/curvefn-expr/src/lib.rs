//! # curvefn-expr
//!
//! Single-variable math expression engine for curvefn.
//!
//! This crate provides:
//! - Expression parsing (text → AST), once per source change
//! - Evaluation at any `x` (AST → `f64`), pure and thread-safe
//! - Built-in math functions (sin, cos, tan, sqrt, abs, log, ln, exp, floor, ceil, round)
//! - Non-fatal diagnostics for malformed input
//!
//! Grammar highlights: implicit multiplication (`2x`, `3sin(x)`, `x(x+1)`),
//! left-associative `^`, superscript `²`/`³`, constants `e` and `pi`, and a
//! decimal comma (`1,5`).
//!
//! ## Example
//!
//! ```rust
//! use curvefn_expr::{compile, compile_with_policy, NumericPolicy};
//!
//! let f = compile("x^2 + 3x");
//! assert_eq!(f.evaluate(2.0), 10.0);
//!
//! let g = compile_with_policy("sqrt(x)", NumericPolicy::absolute_sqrt());
//! assert_eq!(g.evaluate(-9.0), 3.0);
//! ```

pub mod ast;
pub mod compiled;
pub mod diagnostic;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod policy;

pub use ast::{BinaryOperator, Expr};
pub use compiled::{compile, compile_with_policy, CompiledExpression};
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
pub use error::{ExprError, ExprResult};
pub use evaluator::{evaluate, evaluate_expr};
pub use functions::{function_registry, FunctionRegistry, MathFunction};
pub use parser::{parse_strict, MAX_NESTING, MAX_SOURCE_LEN};
pub use policy::{LogBase, NumericPolicy, SqrtDomain};

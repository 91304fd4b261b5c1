//! Expression Abstract Syntax Tree types

use crate::functions::MathFunction;

/// Expression AST over the single free variable `x`
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // === Leaves ===
    /// Numeric literal or named constant (`e`, `pi`)
    Number(f64),
    /// The bound variable `x`
    Variable,
    /// Placeholder for a factor that could not be parsed; evaluates to 0
    Missing,

    // === Operators ===
    /// Prefix minus
    Negate(Box<Expr>),
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Postfix `²`
    Square(Box<Expr>),
    /// Postfix `³`
    Cube(Box<Expr>),

    // === Function call ===
    /// Registered single-argument function
    Function {
        function: MathFunction,
        arg: Box<Expr>,
    },
    /// Name that did not resolve to a function; evaluates to 0.
    ///
    /// The argument, if there was one, is kept so the tree mirrors the source.
    UnknownFunction {
        name: String,
        arg: Option<Box<Expr>>,
    },
}

impl Expr {
    pub(crate) fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True if `x` appears anywhere in the tree
    pub fn depends_on_x(&self) -> bool {
        match self {
            Expr::Variable => true,
            Expr::Number(_) | Expr::Missing => false,
            Expr::Negate(inner) | Expr::Square(inner) | Expr::Cube(inner) => inner.depends_on_x(),
            Expr::BinaryOp { left, right, .. } => left.depends_on_x() || right.depends_on_x(),
            Expr::Function { arg, .. } => arg.depends_on_x(),
            // Unknown functions evaluate to 0 regardless of their argument
            Expr::UnknownFunction { .. } => false,
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable | Expr::Missing => 1,
            Expr::Negate(inner) | Expr::Square(inner) | Expr::Cube(inner) => 1 + inner.node_count(),
            Expr::BinaryOp { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Expr::Function { arg, .. } => 1 + arg.node_count(),
            Expr::UnknownFunction { arg, .. } => 1 + arg.as_ref().map_or(0, |a| a.node_count()),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOperator {
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
            BinaryOperator::Power => left.powf(right),
        }
    }
}

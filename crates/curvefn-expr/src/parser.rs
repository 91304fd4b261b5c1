//! Expression parser
//!
//! A recursive descent parser for single-variable math expressions with
//! implicit multiplication and left-associative exponentiation.
//!
//! The parser never fails. Every anomaly is recorded as a [`Diagnostic`] and
//! parsing either carries on (missing `)`) or stops consuming input at the
//! offending character, leaving a partial tree behind.

use crate::ast::{BinaryOperator, Expr};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::ExprResult;
use crate::functions::function_registry;

/// Longest normalized source accepted, in chars
pub const MAX_SOURCE_LEN: usize = 4096;

/// Deepest factor nesting accepted (parentheses, signs, function arguments)
pub const MAX_NESTING: usize = 128;

/// Result of parsing a normalized source
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParseOutcome {
    pub root: Expr,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// An error-level diagnostic makes the whole expression degenerate
    pub fn is_degenerate(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Trim, lowercase and strip all whitespace
///
/// ```rust
/// use curvefn_expr::parser::normalize;
///
/// assert_eq!(normalize("  Sin( X ) "), "sin(x)");
/// ```
pub fn normalize(source: &str) -> String {
    source
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Parse a source string, failing on the first anomaly
///
/// This is the checked counterpart of [`compile`](crate::compile), meant for
/// tooling that wants to reject bad input instead of degrading.
///
/// # Example
/// ```rust
/// use curvefn_expr::parse_strict;
///
/// assert!(parse_strict("3sin(x)").is_ok());
/// assert!(parse_strict("sin(").is_err());
/// ```
pub fn parse_strict(source: &str) -> ExprResult<Expr> {
    let outcome = parse_normalized(&normalize(source));
    match outcome.diagnostics.into_iter().next() {
        Some(diagnostic) => Err(diagnostic.into()),
        None => Ok(outcome.root),
    }
}

/// Parse an already normalized source
pub(crate) fn parse_normalized(source: &str) -> ParseOutcome {
    let chars: Vec<char> = source.chars().collect();

    if chars.is_empty() {
        return ParseOutcome {
            root: Expr::Missing,
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::EmptyExpression,
                0,
                "Empty expression",
            )],
        };
    }

    if chars.len() > MAX_SOURCE_LEN {
        return ParseOutcome {
            root: Expr::Missing,
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::LimitExceeded,
                MAX_SOURCE_LEN,
                format!(
                    "Expression is {} characters long (max: {})",
                    chars.len(),
                    MAX_SOURCE_LEN
                ),
            )],
        };
    }

    let mut parser = ExpressionParser::new(&chars);
    let root = parser.parse_expression();

    // Whatever is left could not be attached to the tree
    if !parser.halted && !parser.is_at_end() {
        let rest: String = chars[parser.pos..].iter().collect();
        parser.report(
            DiagnosticKind::TrailingInput,
            parser.pos,
            format!("Unexpected characters after expression: '{}'", rest),
        );
    }

    ParseOutcome {
        root,
        diagnostics: parser.diagnostics,
    }
}

/// Expression parser
///
/// Owns the cursor for a single parse; nothing here outlives the call that
/// created it.
struct ExpressionParser<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
    /// Set once a hard limit is hit; makes every lookahead report end of input
    halted: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ExpressionParser<'a> {
    fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: 0,
            depth: 0,
            halted: false,
            diagnostics: Vec::new(),
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        if self.halted {
            return None;
        }
        self.chars.get(self.pos).copied()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        if self.halted {
            return None;
        }
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        if self.pos < self.chars.len() {
            self.pos += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn report(&mut self, kind: DiagnosticKind, position: usize, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(kind, position, message));
    }

    fn expect_closing_paren(&mut self, open_pos: usize) {
        if self.peek_char() == Some(')') {
            self.advance();
        } else if !self.halted {
            self.report(
                DiagnosticKind::UnclosedParenthesis,
                open_pos,
                "Missing ')' for '(' opened here",
            );
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /, implicit (adjacency)
    // 3. Exponentiation: ^, ², ³ (left associative)
    // 4. Factor: sign, number, x, e, pi, function call, parentheses

    fn parse_expression(&mut self) -> Expr {
        let mut left = self.parse_term();

        loop {
            let op = match self.peek_char() {
                Some('+') => BinaryOperator::Add,
                Some('-') => BinaryOperator::Subtract,
                _ => break,
            };

            self.advance();
            let right = self.parse_term();
            left = Expr::binary(op, left, right);
        }

        left
    }

    fn parse_term(&mut self) -> Expr {
        let mut left = self.parse_power();

        loop {
            let op = match self.peek_char() {
                Some('*') => {
                    self.advance();
                    BinaryOperator::Multiply
                }
                Some('/') => {
                    self.advance();
                    BinaryOperator::Divide
                }
                // 2x, 3sin(x), x(x+1), pix
                Some(c) if Self::starts_implicit_factor(c) => BinaryOperator::Multiply,
                _ => break,
            };

            let right = self.parse_power();
            left = Expr::binary(op, left, right);
        }

        left
    }

    fn starts_implicit_factor(c: char) -> bool {
        c.is_ascii_digit() || c == 'x' || c.is_alphabetic() || c == '('
    }

    fn parse_power(&mut self) -> Expr {
        let mut result = self.parse_factor();

        loop {
            match self.peek_char() {
                Some('²') => {
                    self.advance();
                    result = Expr::Square(Box::new(result));
                }
                Some('³') => {
                    self.advance();
                    result = Expr::Cube(Box::new(result));
                }
                Some('^') => {
                    self.advance();
                    // The exponent is a single factor, so 2^3^2 = (2^3)^2
                    let exponent = self.parse_factor();
                    result = Expr::binary(BinaryOperator::Power, result, exponent);
                }
                _ => break,
            }
        }

        result
    }

    fn parse_factor(&mut self) -> Expr {
        if self.halted {
            return Expr::Missing;
        }

        if self.depth >= MAX_NESTING {
            self.report(
                DiagnosticKind::LimitExceeded,
                self.pos,
                format!("Expression nested deeper than {} levels", MAX_NESTING),
            );
            self.halted = true;
            return Expr::Missing;
        }

        self.depth += 1;
        let expr = self.parse_factor_inner();
        self.depth -= 1;
        expr
    }

    fn parse_factor_inner(&mut self) -> Expr {
        let c = match self.peek_char() {
            Some(c) => c,
            None => {
                self.report(
                    DiagnosticKind::UnexpectedCharacter,
                    self.pos,
                    "Unexpected end of expression",
                );
                return Expr::Missing;
            }
        };

        match c {
            '-' => {
                self.advance();
                Expr::Negate(Box::new(self.parse_factor()))
            }
            '+' => {
                self.advance();
                self.parse_factor()
            }
            '0'..='9' => self.parse_number(),
            'x' => {
                self.advance();
                Expr::Variable
            }
            // `e` alone is Euler's number; `exp`, `ex`... are names
            'e' if !self.peek_char_at(1).map_or(false, char::is_alphabetic) => {
                self.advance();
                Expr::Number(std::f64::consts::E)
            }
            'p' if self.peek_char_at(1) == Some('i') => {
                self.advance();
                self.advance();
                Expr::Number(std::f64::consts::PI)
            }
            c if c.is_alphabetic() => self.parse_function(),
            '(' => {
                let open_pos = self.pos;
                self.advance();
                let inner = self.parse_expression();
                self.expect_closing_paren(open_pos);
                inner
            }
            other => {
                self.report(
                    DiagnosticKind::UnexpectedCharacter,
                    self.pos,
                    format!("Unexpected character: '{}'", other),
                );
                Expr::Missing
            }
        }
    }

    fn parse_number(&mut self) -> Expr {
        let start = self.pos;
        let mut text = String::new();

        while let Some(c) = self.peek_char() {
            match c {
                '0'..='9' | '.' => text.push(c),
                // Decimal comma
                ',' => text.push('.'),
                _ => break,
            }
            self.advance();
        }

        match text.parse::<f64>() {
            Ok(n) => Expr::Number(n),
            Err(_) => {
                let literal: String = self.chars[start..self.pos].iter().collect();
                self.report(
                    DiagnosticKind::InvalidNumber,
                    start,
                    format!("Invalid number: '{}'", literal),
                );
                Expr::Number(0.0)
            }
        }
    }

    fn parse_function(&mut self) -> Expr {
        let start = self.pos;
        let mut name = String::new();

        while let Some(c) = self.peek_char().filter(|c| c.is_alphabetic()) {
            name.push(c);
            self.advance();
        }

        if self.peek_char() != Some('(') {
            self.report(
                DiagnosticKind::MissingFunctionArgument,
                start,
                format!("Expected '(' after '{}'", name),
            );
            return Expr::UnknownFunction { name, arg: None };
        }

        let function = function_registry().get(&name).map(|def| def.function);
        if function.is_none() {
            self.report(
                DiagnosticKind::UnknownFunction,
                start,
                format!("Unknown function: {}", name),
            );
        }

        let open_pos = self.pos;
        self.advance();
        let arg = Box::new(self.parse_expression());
        self.expect_closing_paren(open_pos);

        match function {
            Some(function) => Expr::Function { function, arg },
            None => Expr::UnknownFunction {
                name,
                arg: Some(arg),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::MathFunction;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> ParseOutcome {
        parse_normalized(&normalize(source))
    }

    fn kinds(source: &str) -> Vec<DiagnosticKind> {
        parse(source).diagnostics.iter().map(|d| d.kind).collect()
    }

    fn num(n: f64) -> Expr {
        Expr::Number(n)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  2 X ^ 2 "), "2x^2");
        assert_eq!(normalize("SIN(X)"), "sin(x)");
        assert_eq!(normalize("\tx\n+ 1"), "x+1");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse("42").root, num(42.0));
        assert_eq!(parse("3.25").root, num(3.25));
        assert_eq!(parse("1,5").root, num(1.5));
        assert_eq!(parse("2.").root, num(2.0));
    }

    #[test]
    fn test_parse_invalid_number() {
        let outcome = parse("1.2.3+x");
        assert!(outcome.is_degenerate());
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::InvalidNumber);
        assert_eq!(outcome.diagnostics[0].position, 0);
    }

    #[test]
    fn test_parse_precedence() {
        // 1+2*3 = 1+(2*3)
        let outcome = parse("1+2*3");
        assert_eq!(
            outcome.root,
            Expr::binary(
                BinaryOperator::Add,
                num(1.0),
                Expr::binary(BinaryOperator::Multiply, num(2.0), num(3.0)),
            )
        );
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_power_left_associative() {
        assert_eq!(
            parse("2^3^2").root,
            Expr::binary(
                BinaryOperator::Power,
                Expr::binary(BinaryOperator::Power, num(2.0), num(3.0)),
                num(2.0),
            )
        );
    }

    #[test]
    fn test_parse_unary_binds_tighter_than_power() {
        assert_eq!(
            parse("-2^2").root,
            Expr::binary(
                BinaryOperator::Power,
                Expr::Negate(Box::new(num(2.0))),
                num(2.0),
            )
        );
        assert_eq!(
            parse("2^-1").root,
            Expr::binary(
                BinaryOperator::Power,
                num(2.0),
                Expr::Negate(Box::new(num(1.0))),
            )
        );
        assert_eq!(parse("+x").root, Expr::Variable);
    }

    #[test]
    fn test_parse_superscripts() {
        assert_eq!(parse("x²").root, Expr::Square(Box::new(Expr::Variable)));
        assert_eq!(
            parse("x³+1").root,
            Expr::binary(
                BinaryOperator::Add,
                Expr::Cube(Box::new(Expr::Variable)),
                num(1.0)
            )
        );
    }

    #[test]
    fn test_parse_implicit_multiplication() {
        assert_eq!(
            parse("2x").root,
            Expr::binary(BinaryOperator::Multiply, num(2.0), Expr::Variable)
        );

        assert_eq!(
            parse("3sin(x)").root,
            Expr::binary(
                BinaryOperator::Multiply,
                num(3.0),
                Expr::Function {
                    function: MathFunction::Sin,
                    arg: Box::new(Expr::Variable),
                },
            )
        );

        assert_eq!(
            parse("x(x+1)").root,
            Expr::binary(
                BinaryOperator::Multiply,
                Expr::Variable,
                Expr::binary(BinaryOperator::Add, Expr::Variable, num(1.0)),
            )
        );
    }

    #[test]
    fn test_parse_constants() {
        assert_eq!(parse("e").root, num(std::f64::consts::E));
        assert_eq!(parse("pi").root, num(std::f64::consts::PI));
        assert_eq!(
            parse("2pi").root,
            Expr::binary(BinaryOperator::Multiply, num(2.0), num(std::f64::consts::PI))
        );
        // e followed by a digit is still the constant
        assert_eq!(
            parse("e2").root,
            Expr::binary(BinaryOperator::Multiply, num(std::f64::consts::E), num(2.0))
        );
    }

    #[test]
    fn test_parse_e_prefixed_names() {
        let outcome = parse("exp(x)");
        assert_eq!(
            outcome.root,
            Expr::Function {
                function: MathFunction::Exp,
                arg: Box::new(Expr::Variable),
            }
        );
        assert_eq!(kinds("ex"), vec![DiagnosticKind::MissingFunctionArgument]);
    }

    #[test]
    fn test_parse_unknown_function() {
        let outcome = parse("foo(x)+1");
        assert_eq!(
            outcome.root,
            Expr::binary(
                BinaryOperator::Add,
                Expr::UnknownFunction {
                    name: "foo".into(),
                    arg: Some(Box::new(Expr::Variable)),
                },
                num(1.0),
            )
        );
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::UnknownFunction);
        assert_eq!(outcome.diagnostics[0].position, 0);
        assert!(!outcome.is_degenerate());
    }

    #[test]
    fn test_parse_name_is_maximal_alphabetic_run() {
        assert_eq!(kinds("sinx"), vec![DiagnosticKind::MissingFunctionArgument]);
    }

    #[test]
    fn test_parse_unclosed_paren() {
        let outcome = parse("sin(");
        assert_eq!(
            outcome
                .diagnostics
                .iter()
                .map(|d| (d.kind, d.position))
                .collect::<Vec<_>>(),
            vec![
                (DiagnosticKind::UnexpectedCharacter, 4),
                (DiagnosticKind::UnclosedParenthesis, 3),
            ]
        );

        let outcome = parse("(x+1");
        assert_eq!(
            outcome.root,
            Expr::binary(BinaryOperator::Add, Expr::Variable, num(1.0))
        );
        assert_eq!(kinds("(x+1"), vec![DiagnosticKind::UnclosedParenthesis]);
    }

    #[test]
    fn test_parse_trailing_input() {
        let outcome = parse("x)+1");
        assert_eq!(outcome.root, Expr::Variable);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::TrailingInput);
        assert_eq!(outcome.diagnostics[0].position, 1);
    }

    #[test]
    fn test_parse_unexpected_character() {
        let outcome = parse("@@@");
        assert_eq!(outcome.root, Expr::Missing);
        assert_eq!(
            kinds("@@@"),
            vec![
                DiagnosticKind::UnexpectedCharacter,
                DiagnosticKind::TrailingInput
            ]
        );

        let outcome = parse("x+");
        assert_eq!(
            outcome.root,
            Expr::binary(BinaryOperator::Add, Expr::Variable, Expr::Missing)
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(kinds("   "), vec![DiagnosticKind::EmptyExpression]);
        assert_eq!(parse("").root, Expr::Missing);
    }

    #[test]
    fn test_parse_nesting_limit() {
        let deep = "(".repeat(MAX_NESTING * 2) + "x";
        let outcome = parse(&deep);
        assert!(outcome.is_degenerate());
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::LimitExceeded));

        let signs = "-".repeat(MAX_NESTING * 2) + "x";
        assert!(parse(&signs).is_degenerate());
    }

    #[test]
    fn test_parse_length_limit() {
        let long = "x+".repeat(MAX_SOURCE_LEN) + "x";
        let outcome = parse(&long);
        assert!(outcome.is_degenerate());
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::LimitExceeded);
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(parse_strict("X").unwrap(), Expr::Variable);

        let err = parse_strict("foo(x)").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::UnknownFunction);

        let err = parse_strict("x)").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::TrailingInput);
    }
}

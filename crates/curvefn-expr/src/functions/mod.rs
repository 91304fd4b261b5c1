//! Built-in single-argument functions

pub mod math;

use crate::policy::NumericPolicy;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Function implementation signature
///
/// Functions receive the policy the expression was compiled with so that
/// domain choices (`sqrt` of negatives, base of `log`) follow the caller.
pub type FunctionImpl = fn(f64, &NumericPolicy) -> f64;

/// Identifies a built-in function inside a parsed expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Abs,
    Log,
    Ln,
    Exp,
    Floor,
    Ceil,
    Round,
}

impl MathFunction {
    /// Every built-in, in registration order
    pub const ALL: [MathFunction; 11] = [
        MathFunction::Sin,
        MathFunction::Cos,
        MathFunction::Tan,
        MathFunction::Sqrt,
        MathFunction::Abs,
        MathFunction::Log,
        MathFunction::Ln,
        MathFunction::Exp,
        MathFunction::Floor,
        MathFunction::Ceil,
        MathFunction::Round,
    ];

    /// Name as written in expressions (lowercase)
    pub fn name(self) -> &'static str {
        match self {
            MathFunction::Sin => "sin",
            MathFunction::Cos => "cos",
            MathFunction::Tan => "tan",
            MathFunction::Sqrt => "sqrt",
            MathFunction::Abs => "abs",
            MathFunction::Log => "log",
            MathFunction::Ln => "ln",
            MathFunction::Exp => "exp",
            MathFunction::Floor => "floor",
            MathFunction::Ceil => "ceil",
            MathFunction::Round => "round",
        }
    }

    fn implementation(self) -> FunctionImpl {
        match self {
            MathFunction::Sin => math::fn_sin,
            MathFunction::Cos => math::fn_cos,
            MathFunction::Tan => math::fn_tan,
            MathFunction::Sqrt => math::fn_sqrt,
            MathFunction::Abs => math::fn_abs,
            MathFunction::Log => math::fn_log,
            MathFunction::Ln => math::fn_ln,
            MathFunction::Exp => math::fn_exp,
            MathFunction::Floor => math::fn_floor,
            MathFunction::Ceil => math::fn_ceil,
            MathFunction::Round => math::fn_round,
        }
    }

    /// Apply the function under the given policy
    #[inline]
    pub fn apply(self, arg: f64, policy: &NumericPolicy) -> f64 {
        (self.implementation())(arg, policy)
    }
}

/// Function definition
///
/// Evaluation dispatches through [`MathFunction::apply`]; the registry only
/// resolves names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDef {
    /// Function name (lowercase)
    pub name: &'static str,
    pub function: MathFunction,
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<&'static str, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        for function in MathFunction::ALL {
            registry.register(FunctionDef {
                name: function.name(),
                function,
            });
        }

        registry
    }

    /// Look up a function by name.
    ///
    /// Names are matched exactly; callers normalize case beforehand.
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Register a function
    fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    /// Registered names in no particular order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

pub fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

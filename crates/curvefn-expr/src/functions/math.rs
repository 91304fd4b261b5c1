//! Math functions

use crate::policy::{LogBase, NumericPolicy, SqrtDomain};

/// SIN function
pub fn fn_sin(arg: f64, _policy: &NumericPolicy) -> f64 {
    arg.sin()
}

/// COS function
pub fn fn_cos(arg: f64, _policy: &NumericPolicy) -> f64 {
    arg.cos()
}

/// TAN function
pub fn fn_tan(arg: f64, _policy: &NumericPolicy) -> f64 {
    arg.tan()
}

/// SQRT function
pub fn fn_sqrt(arg: f64, policy: &NumericPolicy) -> f64 {
    match policy.sqrt {
        SqrtDomain::Strict => arg.sqrt(),
        SqrtDomain::Absolute => arg.abs().sqrt(),
    }
}

/// ABS function
pub fn fn_abs(arg: f64, _policy: &NumericPolicy) -> f64 {
    arg.abs()
}

/// LOG function, natural or base 10 depending on policy
pub fn fn_log(arg: f64, policy: &NumericPolicy) -> f64 {
    match policy.log {
        LogBase::Natural => fn_ln(arg, policy),
        LogBase::Common => {
            if arg > 0.0 {
                arg.log10()
            } else {
                f64::NAN
            }
        }
    }
}

/// LN function
///
/// Non-positive arguments give NaN, including zero.
pub fn fn_ln(arg: f64, _policy: &NumericPolicy) -> f64 {
    if arg > 0.0 {
        arg.ln()
    } else {
        f64::NAN
    }
}

/// EXP function
pub fn fn_exp(arg: f64, _policy: &NumericPolicy) -> f64 {
    arg.exp()
}

/// FLOOR function
pub fn fn_floor(arg: f64, _policy: &NumericPolicy) -> f64 {
    arg.floor()
}

/// CEIL function
pub fn fn_ceil(arg: f64, _policy: &NumericPolicy) -> f64 {
    arg.ceil()
}

/// ROUND function, ties to even
pub fn fn_round(arg: f64, _policy: &NumericPolicy) -> f64 {
    round_half_even(arg)
}

fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        rounded
    }
}

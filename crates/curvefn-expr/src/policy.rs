//! Numeric domain policies
//!
//! Different callers disagree on what `sqrt` of a negative number and `log`
//! mean. Rather than fork the parser, the choice travels with the compiled
//! expression as a [`NumericPolicy`].

/// Behaviour of `sqrt` for negative arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SqrtDomain {
    /// `sqrt(-4)` is NaN
    #[default]
    Strict,
    /// `sqrt(-4)` is `sqrt(|-4|)` = 2
    Absolute,
}

/// Base used by `log`; `ln` is always natural
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogBase {
    #[default]
    Natural,
    /// Base 10
    Common,
}

/// Domain choices applied by the evaluator's built-in functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericPolicy {
    pub sqrt: SqrtDomain,
    pub log: LogBase,
}

impl NumericPolicy {
    /// Mathematically standard behaviour: NaN outside the real domain
    pub const fn strict() -> Self {
        Self {
            sqrt: SqrtDomain::Strict,
            log: LogBase::Natural,
        }
    }

    /// `sqrt` takes the absolute value of its argument first
    pub const fn absolute_sqrt() -> Self {
        Self {
            sqrt: SqrtDomain::Absolute,
            log: LogBase::Natural,
        }
    }

    /// `log` is base 10
    pub const fn common_log() -> Self {
        Self {
            sqrt: SqrtDomain::Strict,
            log: LogBase::Common,
        }
    }

    pub const fn with_sqrt(mut self, sqrt: SqrtDomain) -> Self {
        self.sqrt = sqrt;
        self
    }

    pub const fn with_log(mut self, log: LogBase) -> Self {
        self.log = log;
        self
    }
}

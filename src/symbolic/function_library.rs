//! # Function library
//!
//! The fixed vocabulary a formula may use: two named constants and eleven real
//! functions. Every function works element-wise, so `sqrt(x)` with `x` bound to the
//! whole domain returns the whole column of square roots in one call.
//!
//! The registry is built once per process (`FunctionLibrary::global`) and is read-only
//! afterwards. The set of allowed names is derived from the `MathConstant` and
//! `MathFunction` enums through `strum`, so the validator's whitelist and the functions
//! that actually exist can never disagree.
//!
//! ```
//! use RustedGrapher::symbolic::evaluator::EvalSettings;
//! use RustedGrapher::symbolic::function_library::{FunctionLibrary, MathFunction};
//! use RustedGrapher::symbolic::value::Value;
//! let library = FunctionLibrary::global();
//! assert!(library.allowed_names().contains("cosec"));
//! let root = MathFunction::Sqrt.apply(&[Value::Scalar(49.0)], &EvalSettings::default());
//! assert_eq!(root.unwrap(), Value::Scalar(7.0));
//! ```
use crate::symbolic::evaluator::EvalSettings;
use crate::symbolic::value::{
    ElementResult, NumericFault, NumericPolicy, Value, map_binary, map_unary,
};
use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{E, PI};
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// |denominator| below this is treated as a pole of cosec, sec and cot under the strict policy
pub const POLE_TOLERANCE: f64 = 1e-12;
/// 171! does not fit into f64
pub const MAX_FACTORIAL_ARG: f64 = 170.0;
/// base of `log(x)` when called with one argument
pub const DEFAULT_LOG_BASE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MathConstant {
    E,
    Pi,
}

impl MathConstant {
    pub fn value(self) -> f64 {
        match self {
            MathConstant::E => E,
            MathConstant::Pi => PI,
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Functions a formula is allowed to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    /// 1/sin(x)
    Cosec,
    /// 1/cos(x)
    Sec,
    /// 1/tan(x)
    Cot,
    Sqrt,
    Cbrt,
    /// natural logarithm
    Ln,
    /// log(x, base = 10) = ln(x)/ln(base)
    Log,
    Factorial,
}

impl MathFunction {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// how many arguments the function accepts
    pub fn arity(self) -> RangeInclusive<usize> {
        match self {
            MathFunction::Log => 1..=2,
            _ => 1..=1,
        }
    }

    /// Applies the function element-wise to already evaluated arguments.
    ///
    /// The argument count must fit `arity()`; the validator and the evaluator check it
    /// before a call ever gets here.
    pub fn apply(self, args: &[Value], settings: &EvalSettings) -> ElementResult<Value> {
        let strict = settings.policy == NumericPolicy::Strict;
        match (self, args) {
            (MathFunction::Log, [x, base]) => map_binary(x, base, |x, b| logarithm(x, b, strict)),
            (_, [x]) => map_unary(x, |x| self.kernel(x, settings)),
            _ => Err((NumericFault::Undefined, None)),
        }
    }

    /// the scalar version of the function
    fn kernel(self, x: f64, settings: &EvalSettings) -> Result<f64, NumericFault> {
        let strict = settings.policy == NumericPolicy::Strict;
        match self {
            MathFunction::Sin => Ok(x.sin()),
            MathFunction::Cos => Ok(x.cos()),
            MathFunction::Tan => Ok(x.tan()),
            MathFunction::Cosec => reciprocal(x.sin(), strict),
            MathFunction::Sec => reciprocal(x.cos(), strict),
            MathFunction::Cot => reciprocal(x.tan(), strict),
            MathFunction::Sqrt => root(x, f64::sqrt, settings),
            // no real root for negative x, same as sqrt
            MathFunction::Cbrt => root(x, f64::cbrt, settings),
            MathFunction::Ln => {
                if strict && x <= 0.0 {
                    Err(NumericFault::NonPositiveLogarithm)
                } else {
                    Ok(x.ln())
                }
            }
            MathFunction::Log => logarithm(x, DEFAULT_LOG_BASE, strict),
            MathFunction::Factorial => factorial(x, strict),
        }
    }
}

/// `extract` of a non-negative number, NaN for negatives under Propagate
fn root(x: f64, extract: fn(f64) -> f64, settings: &EvalSettings) -> Result<f64, NumericFault> {
    if x < 0.0 {
        return match settings.policy {
            NumericPolicy::Strict => Err(NumericFault::NegativeRoot),
            NumericPolicy::Propagate => Ok(f64::NAN),
        };
    }
    Ok(round_to(extract(x), settings.root_precision))
}

fn reciprocal(denominator: f64, strict: bool) -> Result<f64, NumericFault> {
    if strict && denominator.abs() < POLE_TOLERANCE {
        Err(NumericFault::Pole)
    } else {
        Ok(1.0 / denominator)
    }
}

fn logarithm(x: f64, base: f64, strict: bool) -> Result<f64, NumericFault> {
    if strict {
        if !(base > 0.0) || base == 1.0 {
            return Err(NumericFault::InvalidLogBase);
        }
        if x <= 0.0 {
            return Err(NumericFault::NonPositiveLogarithm);
        }
    }
    Ok(x.ln() / base.ln())
}

/// n! for non-negative integers only, whatever the policy
fn factorial(x: f64, strict: bool) -> Result<f64, NumericFault> {
    if !(x >= 0.0) || x.fract() != 0.0 {
        return Err(NumericFault::FactorialDomain);
    }
    if x > MAX_FACTORIAL_ARG {
        return if strict {
            Err(NumericFault::Overflow)
        } else {
            Ok(f64::INFINITY)
        };
    }
    Ok((2..=x as u64).fold(1.0, |acc, k| acc * k as f64))
}

/// rounding to more places than this is a no-op for f64, and past 308 the scale overflows
pub const MAX_ROOT_PRECISION: u32 = 15;

fn round_to(value: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(decimals) => {
            let scale = 10f64.powi(decimals.min(MAX_ROOT_PRECISION) as i32);
            (value * scale).round() / scale
        }
        None => value,
    }
}

/// what a whitelisted name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryEntry {
    Constant(MathConstant),
    Function(MathFunction),
}

/// Identifiers a formula may reference. Derived from the library, never edited by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedNames {
    names: BTreeSet<&'static str>,
}

impl AllowedNames {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// immutable name -> constant/function registry
#[derive(Debug)]
pub struct FunctionLibrary {
    entries: BTreeMap<&'static str, LibraryEntry>,
    allowed: AllowedNames,
}

static LIBRARY: LazyLock<FunctionLibrary> = LazyLock::new(FunctionLibrary::build);

impl FunctionLibrary {
    /// the process-wide library, initialized on first use and never modified
    pub fn global() -> &'static FunctionLibrary {
        &LIBRARY
    }

    fn build() -> FunctionLibrary {
        let mut entries = BTreeMap::new();
        for constant in MathConstant::iter() {
            entries.insert(constant.name(), LibraryEntry::Constant(constant));
        }
        for function in MathFunction::iter() {
            entries.insert(function.name(), LibraryEntry::Function(function));
        }
        let allowed = AllowedNames {
            names: entries.keys().copied().collect(),
        };
        FunctionLibrary { entries, allowed }
    }

    pub fn get(&self, name: &str) -> Option<LibraryEntry> {
        self.entries.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<MathFunction> {
        match self.get(name) {
            Some(LibraryEntry::Function(function)) => Some(function),
            _ => None,
        }
    }

    pub fn allowed_names(&self) -> &AllowedNames {
        &self.allowed
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, LibraryEntry)> + '_ {
        self.entries.iter().map(|(name, entry)| (*name, *entry))
    }

    /// names of all functions, longest first (shorthand expansion relies on this order)
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, LibraryEntry::Function(_)))
            .map(|(name, _)| *name)
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        names
    }
}

//! # Validator
//!
//! The gate between untrusted text and evaluation. Every node of the tree is checked
//! against the function library before anything is computed, and the only way to get a
//! [`ValidatedFormula`] (the one thing the evaluator accepts) is to pass this check.
//!
//! A node is accepted when
//! - `Constant`: the literal is finite
//! - `Name`: the name is an identifier and does not denote a library function
//! - `BinaryOp`: both operands are accepted
//! - `Call`: the target is a library function (not a constant, not an unknown name), the
//!   argument count fits its arity and every argument is accepted
//!
//! and the tree is not deeper than [`MAX_TREE_DEPTH`]. Names that are not in the library
//! (the variable, or a typo such as `y`) are left to the evaluator, which refuses any
//! name the environment does not bind.
use crate::symbolic::function_library::{FunctionLibrary, LibraryEntry, MathFunction};
use crate::symbolic::syntax_tree::{FormulaExpr, is_identifier};
use std::fmt;

/// deepest tree the evaluator will ever be asked to walk
pub const MAX_TREE_DEPTH: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NonFiniteConstant(f64),
    /// name or call target that is not an identifier, e.g. `os.system`
    InvalidName(String),
    /// `sin + 1`: a function used where a value is expected
    FunctionAsValue(String),
    /// call target outside the allowed name set
    UnknownFunction(String),
    /// `pi(2)`: the target is a library constant
    NotCallable(String),
    Arity {
        function: MathFunction,
        expected: (usize, usize),
        found: usize,
    },
    TooDeep { limit: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::NonFiniteConstant(value) => {
                write!(f, "constant {} is not a finite number", value)
            }
            ValidationError::InvalidName(name) => write!(f, "`{}` is not a valid name", name),
            ValidationError::FunctionAsValue(name) => {
                write!(f, "function `{}` is used as a value; call it instead", name)
            }
            ValidationError::UnknownFunction(name) => {
                write!(f, "call to `{}` is not allowed", name)
            }
            ValidationError::NotCallable(name) => write!(f, "`{}` is a constant, not a function", name),
            ValidationError::Arity {
                function,
                expected: (min, max),
                found,
            } => {
                if min == max {
                    write!(f, "{} takes {} argument(s), got {}", function, min, found)
                } else {
                    write!(
                        f,
                        "{} takes {} to {} arguments, got {}",
                        function, min, max, found
                    )
                }
            }
            ValidationError::TooDeep { limit } => {
                write!(f, "formula tree is deeper than {} levels", limit)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A syntax tree that passed [`validate_formula`]. Cannot be built any other way.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFormula {
    tree: FormulaExpr,
}

impl ValidatedFormula {
    pub fn tree(&self) -> &FormulaExpr {
        &self.tree
    }
}

impl fmt::Display for ValidatedFormula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tree)
    }
}

/// Checks every node of `tree` and wraps it into a [`ValidatedFormula`].
///
/// # Examples
/// ```
/// use RustedGrapher::symbolic::function_library::FunctionLibrary;
/// use RustedGrapher::symbolic::parse_formula::parse_formula;
/// use RustedGrapher::symbolic::validator::validate_formula;
/// let library = FunctionLibrary::global();
/// assert!(validate_formula(parse_formula("sin(x)**2").unwrap(), library).is_ok());
/// assert!(validate_formula(parse_formula("system(x)").unwrap(), library).is_err());
/// ```
pub fn validate_formula(
    tree: FormulaExpr,
    library: &FunctionLibrary,
) -> Result<ValidatedFormula, ValidationError> {
    check_node(&tree, library, 1)?;
    Ok(ValidatedFormula { tree })
}

fn check_node(
    node: &FormulaExpr,
    library: &FunctionLibrary,
    depth: usize,
) -> Result<(), ValidationError> {
    if depth > MAX_TREE_DEPTH {
        return Err(ValidationError::TooDeep {
            limit: MAX_TREE_DEPTH,
        });
    }
    match node {
        FormulaExpr::Constant(value) => {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ValidationError::NonFiniteConstant(*value))
            }
        }
        FormulaExpr::Name(name) => {
            if !is_identifier(name) {
                return Err(ValidationError::InvalidName(name.clone()));
            }
            match library.get(name) {
                Some(LibraryEntry::Function(_)) => {
                    Err(ValidationError::FunctionAsValue(name.clone()))
                }
                Some(LibraryEntry::Constant(_)) | None => Ok(()),
            }
        }
        FormulaExpr::BinaryOp(_, left, right) => {
            check_node(left, library, depth + 1)?;
            check_node(right, library, depth + 1)
        }
        FormulaExpr::Call(name, args) => {
            if !is_identifier(name) {
                return Err(ValidationError::InvalidName(name.clone()));
            }
            if !library.allowed_names().contains(name) {
                return Err(ValidationError::UnknownFunction(name.clone()));
            }
            let function = match library.get(name) {
                Some(LibraryEntry::Function(function)) => function,
                Some(LibraryEntry::Constant(_)) => {
                    return Err(ValidationError::NotCallable(name.clone()));
                }
                None => return Err(ValidationError::UnknownFunction(name.clone())),
            };
            let arity = function.arity();
            if !arity.contains(&args.len()) {
                return Err(ValidationError::Arity {
                    function,
                    expected: (*arity.start(), *arity.end()),
                    found: args.len(),
                });
            }
            for arg in args {
                check_node(arg, library, depth + 1)?;
            }
            Ok(())
        }
    }
}

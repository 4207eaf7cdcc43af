//! # Evaluator
//!
//! Computes a [`ValidatedFormula`] over the whole domain at once. The formula's variable
//! is bound to the domain array, library constants to scalars and library functions to
//! [`MathFunction`]s; nothing else is reachable from a formula.
//!
//! Scalars stay scalars until they meet the domain array, so `2**4` is computed once and
//! filled across the domain at the very end.
use crate::symbolic::function_library::{FunctionLibrary, LibraryEntry, MathFunction};
use crate::symbolic::syntax_tree::{BinaryOperator, FormulaExpr};
use crate::symbolic::validator::ValidatedFormula;
use crate::symbolic::value::{NumericFault, NumericPolicy, Value, map_binary};
use ndarray::{Array1, ArrayView1};
use std::collections::HashMap;
use std::fmt;

/// numeric knobs of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalSettings {
    pub policy: NumericPolicy,
    /// round `sqrt` and `cbrt` results to this many decimal places; None keeps full precision
    pub root_precision: Option<u32>,
}

/// what a name stands for during one evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Binding<'a> {
    Constant(f64),
    Function(MathFunction),
    /// the domain, bound to the formula's variable
    Sequence(ArrayView1<'a, f64>),
}

/// Name bindings of a single evaluation. Built fresh for every call, never shared.
#[derive(Debug, Clone)]
pub struct Environment<'a> {
    bindings: HashMap<String, Binding<'a>>,
    variable: String,
    domain: ArrayView1<'a, f64>,
}

impl<'a> Environment<'a> {
    /// library constants and functions, then the domain under `variable`
    pub fn new(library: &FunctionLibrary, variable: &str, domain: ArrayView1<'a, f64>) -> Self {
        let mut bindings: HashMap<String, Binding<'a>> = library
            .entries()
            .map(|(name, entry)| {
                let binding = match entry {
                    LibraryEntry::Constant(constant) => Binding::Constant(constant.value()),
                    LibraryEntry::Function(function) => Binding::Function(function),
                };
                (name.to_string(), binding)
            })
            .collect();
        bindings.insert(variable.to_string(), Binding::Sequence(domain));
        Environment {
            bindings,
            variable: variable.to_string(),
            domain,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding<'a>> {
        self.bindings.get(name)
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn domain(&self) -> ArrayView1<'a, f64> {
        self.domain
    }

    /// sample point at `index`, if the index belongs to the domain
    fn point(&self, index: Option<usize>) -> Option<f64> {
        index.and_then(|i| self.domain.get(i).copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    UnboundName(String),
    NotCallable(String),
    NotAValue(String),
    Arity {
        function: MathFunction,
        found: usize,
    },
    /// numeric failure inside `operation`; `at` is the sample point when it is known
    Domain {
        operation: String,
        fault: NumericFault,
        at: Option<f64>,
    },
    ShapeMismatch {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvaluationError::UnboundName(name) => write!(f, "name `{}` is not defined", name),
            EvaluationError::NotCallable(name) => write!(f, "`{}` is not a function", name),
            EvaluationError::NotAValue(name) => {
                write!(f, "function `{}` is used as a value", name)
            }
            EvaluationError::Arity { function, found } => {
                write!(f, "{} cannot take {} argument(s)", function, found)
            }
            EvaluationError::Domain {
                operation,
                fault,
                at: Some(point),
            } => write!(f, "`{}`: {} at sample point {}", operation, fault, point),
            EvaluationError::Domain {
                operation,
                fault,
                at: None,
            } => write!(f, "`{}`: {}", operation, fault),
            EvaluationError::ShapeMismatch { expected, found } => write!(
                f,
                "result has {} values, the domain has {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for EvaluationError {}

/// Evaluates `formula` over the environment's domain.
///
/// The result always has the domain's length: a scalar result (a formula that does not
/// depend on the variable) is filled across the domain.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use RustedGrapher::symbolic::evaluator::{evaluate, EvalSettings, Environment};
/// use RustedGrapher::symbolic::function_library::FunctionLibrary;
/// use RustedGrapher::symbolic::parse_formula::parse_formula;
/// use RustedGrapher::symbolic::validator::validate_formula;
/// let library = FunctionLibrary::global();
/// let domain = array![1.0, 2.0, 3.0];
/// let formula = validate_formula(parse_formula("x**2 + 1").unwrap(), library).unwrap();
/// let env = Environment::new(library, "x", domain.view());
/// let values = evaluate(&formula, &env, &EvalSettings::default()).unwrap();
/// assert_eq!(values, array![2.0, 5.0, 10.0]);
/// ```
pub fn evaluate(
    formula: &ValidatedFormula,
    env: &Environment,
    settings: &EvalSettings,
) -> Result<Array1<f64>, EvaluationError> {
    let value = eval_node(formula.tree(), env, settings)?;
    let expected = env.domain().len();
    value
        .into_sequence(expected)
        .map_err(|found| EvaluationError::ShapeMismatch { expected, found })
}

fn eval_node(
    node: &FormulaExpr,
    env: &Environment,
    settings: &EvalSettings,
) -> Result<Value, EvaluationError> {
    match node {
        FormulaExpr::Constant(value) => Ok(Value::Scalar(*value)),
        FormulaExpr::Name(name) => match env.lookup(name) {
            Some(Binding::Constant(value)) => Ok(Value::Scalar(*value)),
            Some(Binding::Sequence(values)) => Ok(Value::Array(values.to_owned())),
            Some(Binding::Function(_)) => Err(EvaluationError::NotAValue(name.clone())),
            None => Err(EvaluationError::UnboundName(name.clone())),
        },
        FormulaExpr::BinaryOp(op, left, right) => {
            let lhs = eval_node(left, env, settings)?;
            let rhs = eval_node(right, env, settings)?;
            let strict = settings.policy == NumericPolicy::Strict;
            map_binary(&lhs, &rhs, |a, b| apply_operator(*op, a, b, strict))
                .map_err(|failure| domain_error(op.symbol(), failure, env))
        }
        FormulaExpr::Call(name, args) => {
            let function = match env.lookup(name) {
                Some(Binding::Function(function)) => *function,
                Some(_) => return Err(EvaluationError::NotCallable(name.clone())),
                None => return Err(EvaluationError::UnboundName(name.clone())),
            };
            if !function.arity().contains(&args.len()) {
                return Err(EvaluationError::Arity {
                    function,
                    found: args.len(),
                });
            }
            let values = args
                .iter()
                .map(|arg| eval_node(arg, env, settings))
                .collect::<Result<Vec<Value>, EvaluationError>>()?;
            function
                .apply(&values, settings)
                .map_err(|failure| domain_error(function.name(), failure, env))
        }
    }
}

fn domain_error(
    operation: &str,
    (fault, index): (NumericFault, Option<usize>),
    env: &Environment,
) -> EvaluationError {
    EvaluationError::Domain {
        operation: operation.to_string(),
        fault,
        at: env.point(index),
    }
}

/// floored remainder: the sign follows the divisor, `-1 % 3 == 2`
fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

/// One element of `a op b`. Under the strict policy finite operands must give a finite
/// result; non-finite operands are passed through untouched.
fn apply_operator(op: BinaryOperator, a: f64, b: f64, strict: bool) -> Result<f64, NumericFault> {
    let result = match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => a / b,
        BinaryOperator::Rem => floored_rem(a, b),
        BinaryOperator::Pow => a.powf(b),
    };
    if !strict || result.is_finite() || !a.is_finite() || !b.is_finite() {
        return Ok(result);
    }
    Err(operator_fault(op, a, b, result))
}

fn operator_fault(op: BinaryOperator, a: f64, b: f64, result: f64) -> NumericFault {
    match op {
        BinaryOperator::Div | BinaryOperator::Rem if b == 0.0 => NumericFault::DivisionByZero,
        BinaryOperator::Pow if a == 0.0 && b < 0.0 => NumericFault::DivisionByZero,
        BinaryOperator::Pow if a < 0.0 && b.fract() != 0.0 => NumericFault::NegativeRoot,
        _ if result.is_nan() => NumericFault::Undefined,
        _ => NumericFault::Overflow,
    }
}

//! Scalar-or-array values flowing through the evaluator, and the element-wise helpers
//! every operator and library function is built on.
//!
//! A formula is evaluated over the whole domain at once: the variable is bound to an
//! `Array1<f64>`, literals and constants stay scalars until they meet an array, and the
//! helpers below broadcast a scalar against an array the way numpy-like code does.
use ndarray::{Array1, Zip};
use strum_macros::{Display, EnumString};

/// What went wrong numerically at a single element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NumericFault {
    #[strum(to_string = "division by zero")]
    DivisionByZero,
    #[strum(to_string = "root of a negative number")]
    NegativeRoot,
    #[strum(to_string = "logarithm of a non-positive number")]
    NonPositiveLogarithm,
    #[strum(to_string = "logarithm base must be positive and not equal to 1")]
    InvalidLogBase,
    #[strum(to_string = "pole of a reciprocal trigonometric function")]
    Pole,
    #[strum(to_string = "factorial is defined only for non-negative integers")]
    FactorialDomain,
    #[strum(to_string = "result overflows f64")]
    Overflow,
    #[strum(to_string = "undefined result")]
    Undefined,
    #[strum(to_string = "operands have different lengths")]
    LengthMismatch,
}

/// How numeric domain errors are treated during evaluation.
///
/// `Strict` aborts the formula at the first offending sample point, `Propagate` keeps
/// IEEE `inf`/`NaN` in the output sequence (plotting backends usually draw a gap there).
/// Factorial of a non-integer is an error under both policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NumericPolicy {
    #[default]
    Strict,
    Propagate,
}

/// failed element: the fault and the index of the element (None for scalar operations)
pub type ElementResult<T> = Result<T, (NumericFault, Option<usize>)>;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Array(Array1<f64>),
}

impl Value {
    /// Turns the value into an output sequence of length `len`: scalars are filled across
    /// the whole domain, arrays must already have the right length.
    /// Returns the offending length on mismatch.
    pub fn into_sequence(self, len: usize) -> Result<Array1<f64>, usize> {
        match self {
            Value::Scalar(value) => Ok(Array1::from_elem(len, value)),
            Value::Array(values) if values.len() == len => Ok(values),
            Value::Array(values) => Err(values.len()),
        }
    }
}

/// applies `f` to every element of `arg`, stopping at the first failing element
pub fn map_unary<F>(arg: &Value, f: F) -> ElementResult<Value>
where
    F: Fn(f64) -> Result<f64, NumericFault>,
{
    match arg {
        Value::Scalar(x) => f(*x).map(Value::Scalar).map_err(|fault| (fault, None)),
        Value::Array(xs) => {
            let mut out = Array1::zeros(xs.len());
            for (i, (y, &x)) in out.iter_mut().zip(xs.iter()).enumerate() {
                *y = f(x).map_err(|fault| (fault, Some(i)))?;
            }
            Ok(Value::Array(out))
        }
    }
}

/// applies `f` pairwise, broadcasting a scalar operand against an array one
pub fn map_binary<F>(lhs: &Value, rhs: &Value, f: F) -> ElementResult<Value>
where
    F: Fn(f64, f64) -> Result<f64, NumericFault>,
{
    match (lhs, rhs) {
        (Value::Scalar(a), Value::Scalar(b)) => {
            f(*a, *b).map(Value::Scalar).map_err(|fault| (fault, None))
        }
        (Value::Array(_), Value::Scalar(b)) => map_unary(lhs, |a| f(a, *b)),
        (Value::Scalar(a), Value::Array(_)) => map_unary(rhs, |b| f(*a, b)),
        (Value::Array(xs), Value::Array(ys)) => {
            if xs.len() != ys.len() {
                return Err((NumericFault::LengthMismatch, None));
            }
            let mut out = Array1::zeros(xs.len());
            let mut failure = None;
            Zip::indexed(&mut out)
                .and(xs)
                .and(ys)
                .for_each(|i, y, &a, &b| {
                    if failure.is_some() {
                        return;
                    }
                    match f(a, b) {
                        Ok(value) => *y = value,
                        Err(fault) => failure = Some((fault, Some(i))),
                    }
                });
            match failure {
                Some(failure) => Err(failure),
                None => Ok(Value::Array(out)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scalar_broadcasts_against_array() {
        let lhs = Value::Array(array![1.0, 2.0, 3.0]);
        let rhs = Value::Scalar(10.0);
        let sum = map_binary(&lhs, &rhs, |a, b| Ok(a + b)).unwrap();
        assert_eq!(sum, Value::Array(array![11.0, 12.0, 13.0]));
        let diff = map_binary(&rhs, &lhs, |a, b| Ok(a - b)).unwrap();
        assert_eq!(diff, Value::Array(array![9.0, 8.0, 7.0]));
    }

    #[test]
    fn test_first_failing_element_is_reported() {
        let xs = Value::Array(array![4.0, -1.0, -9.0]);
        let result = map_unary(&xs, |x| {
            if x < 0.0 {
                Err(NumericFault::NegativeRoot)
            } else {
                Ok(x.sqrt())
            }
        });
        assert_eq!(result, Err((NumericFault::NegativeRoot, Some(1))));
    }

    #[test]
    fn test_length_mismatch() {
        let a = Value::Array(array![1.0, 2.0]);
        let b = Value::Array(array![1.0, 2.0, 3.0]);
        let result = map_binary(&a, &b, |x, y| Ok(x * y));
        assert_eq!(result, Err((NumericFault::LengthMismatch, None)));
    }

    #[test]
    fn test_into_sequence_fills_scalars() {
        assert_eq!(
            Value::Scalar(16.0).into_sequence(3).unwrap(),
            array![16.0, 16.0, 16.0]
        );
        assert_eq!(Value::Array(array![1.0, 2.0]).into_sequence(3), Err(2));
    }

    #[test]
    fn test_policy_from_str() {
        use std::str::FromStr;
        assert_eq!(NumericPolicy::from_str("strict").unwrap(), NumericPolicy::Strict);
        assert_eq!(
            NumericPolicy::from_str("propagate").unwrap(),
            NumericPolicy::Propagate
        );
        assert!(NumericPolicy::from_str("lenient").is_err());
    }
}

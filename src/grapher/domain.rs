//! Sample points of the independent variable.
//!
//! Points are `lower, lower + step, ...` up to and including `upper` when `upper` lies on
//! the grid (within rounding), so `[-pi, pi]` with step `pi/2` gives five points.
use ndarray::{Array1, ArrayView1};
use std::fmt;

pub const DEFAULT_LOWER: f64 = -50.0;
pub const DEFAULT_UPPER: f64 = 50.0;
pub const DEFAULT_STEP: f64 = 0.01;
/// a larger domain is refused instead of allocating gigabytes
pub const MAX_DOMAIN_POINTS: usize = 10_000_000;
// slack for (upper - lower)/step landing just below an integer
const GRID_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    NonFiniteBound,
    EmptyRange { lower: f64, upper: f64 },
    NonPositiveStep(f64),
    TooFewPoints(usize),
    TooManyPoints { points: f64, limit: usize },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DomainError::NonFiniteBound => write!(f, "domain bounds must be finite numbers"),
            DomainError::EmptyRange { lower, upper } => write!(
                f,
                "lower bound {} is greater than upper bound {}",
                lower, upper
            ),
            DomainError::NonPositiveStep(step) => {
                write!(f, "step must be a positive finite number, got {}", step)
            }
            DomainError::TooFewPoints(n) => {
                write!(f, "a domain needs at least 2 points, got {}", n)
            }
            DomainError::TooManyPoints { points, limit } => write!(
                f,
                "domain would have {} points, the limit is {}",
                points, limit
            ),
        }
    }
}

impl std::error::Error for DomainError {}

/// Ordered sample points shared by every formula of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    lower: f64,
    upper: f64,
    step: f64,
    points: Array1<f64>,
}

impl Domain {
    /// `lower, lower + step, ...` not beyond `upper`
    pub fn new(lower: f64, upper: f64, step: f64) -> Result<Domain, DomainError> {
        check_bounds(lower, upper)?;
        if !(step.is_finite() && step > 0.0) {
            return Err(DomainError::NonPositiveStep(step));
        }
        let intervals = ((upper - lower) / step + GRID_TOLERANCE).floor();
        if intervals + 1.0 > MAX_DOMAIN_POINTS as f64 {
            return Err(DomainError::TooManyPoints {
                points: intervals + 1.0,
                limit: MAX_DOMAIN_POINTS,
            });
        }
        let n = intervals as usize + 1;
        let points = Array1::from_shape_fn(n, |i| (lower + i as f64 * step).min(upper));
        Ok(Domain {
            lower,
            upper,
            step,
            points,
        })
    }

    /// `n` evenly spaced points, both bounds included
    pub fn linspace(lower: f64, upper: f64, n: usize) -> Result<Domain, DomainError> {
        check_bounds(lower, upper)?;
        if n < 2 {
            return Err(DomainError::TooFewPoints(n));
        }
        if n > MAX_DOMAIN_POINTS {
            return Err(DomainError::TooManyPoints {
                points: n as f64,
                limit: MAX_DOMAIN_POINTS,
            });
        }
        Ok(Domain {
            lower,
            upper,
            step: (upper - lower) / (n - 1) as f64,
            points: Array1::linspace(lower, upper, n),
        })
    }

    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.points.view()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

fn check_bounds(lower: f64, upper: f64) -> Result<(), DomainError> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(DomainError::NonFiniteBound);
    }
    if lower > upper {
        return Err(DomainError::EmptyRange { lower, upper });
    }
    Ok(())
}

/// [-50, 50] with step 0.01
impl Default for Domain {
    fn default() -> Self {
        let n = ((DEFAULT_UPPER - DEFAULT_LOWER) / DEFAULT_STEP + GRID_TOLERANCE).floor() as usize + 1;
        Domain {
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
            step: DEFAULT_STEP,
            points: Array1::from_shape_fn(n, |i| {
                (DEFAULT_LOWER + i as f64 * DEFAULT_STEP).min(DEFAULT_UPPER)
            }),
        }
    }
}

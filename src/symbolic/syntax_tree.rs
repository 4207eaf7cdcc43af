//! # Syntax tree
//!
//! The closed set of nodes a formula can be made of. There is no statement, attribute,
//! index, literal-collection or lambda node, so whatever the parser or a caller builds,
//! the evaluator can only ever see constants, names, arithmetic and calls.
//!
//! ```text
//!  "x - x**3/factorial(3)"
//!
//!            BinaryOp(Sub)
//!           /             \
//!      Name(x)        BinaryOp(Div)
//!                    /             \
//!            BinaryOp(Pow)     Call(factorial)
//!             /       \              |
//!        Name(x)  Constant(3)   Constant(3)
//! ```
use itertools::Itertools;
use std::fmt;
use strum_macros::{EnumIter, IntoStaticStr};

/// Arithmetic operators allowed between two sub-expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum BinaryOperator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    /// floored remainder, sign follows the divisor
    #[strum(serialize = "%")]
    Rem,
    /// canonical power token `**`
    #[strum(serialize = "**")]
    Pow,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Restricted abstract syntax tree of a formula.
///
/// Unary minus has no node of its own: `-u` is `BinaryOp(Mul, Constant(-1), u)` and a
/// negative literal is folded into its `Constant`.
#[derive(Clone, Debug, PartialEq)]
pub enum FormulaExpr {
    /// numeric literal
    Constant(f64),
    /// variable or named constant
    Name(String),
    /// `left op right`
    BinaryOp(BinaryOperator, Box<FormulaExpr>, Box<FormulaExpr>),
    /// `name(arg, ...)`
    Call(String, Vec<FormulaExpr>),
}

impl FormulaExpr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
        FormulaExpr::BinaryOp(op, left.boxed(), right.boxed())
    }

    pub fn name(name: &str) -> FormulaExpr {
        FormulaExpr::Name(name.to_string())
    }

    pub fn call(name: &str, args: Vec<FormulaExpr>) -> FormulaExpr {
        FormulaExpr::Call(name.to_string(), args)
    }

    /// `-self`, folding literals
    pub fn negated(self) -> FormulaExpr {
        match self {
            FormulaExpr::Constant(value) => FormulaExpr::Constant(-value),
            other => FormulaExpr::binary(BinaryOperator::Mul, FormulaExpr::Constant(-1.0), other),
        }
    }

    /// depth of the tree, a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            FormulaExpr::Constant(_) | FormulaExpr::Name(_) => 1,
            FormulaExpr::BinaryOp(_, left, right) => 1 + left.depth().max(right.depth()),
            FormulaExpr::Call(_, args) => 1 + args.iter().map(|a| a.depth()).max().unwrap_or(0),
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the only shape a name or a call target may have
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Fully parenthesized canonical text, parses back into the same tree
impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormulaExpr::Constant(value) if *value < 0.0 => write!(f, "({:?})", value),
            FormulaExpr::Constant(value) => write!(f, "{:?}", value),
            FormulaExpr::Name(name) => write!(f, "{}", name),
            FormulaExpr::BinaryOp(op, left, right) => write!(f, "({} {} {})", left, op, right),
            FormulaExpr::Call(name, args) => write!(f, "{}({})", name, args.iter().join(", ")),
        }
    }
}

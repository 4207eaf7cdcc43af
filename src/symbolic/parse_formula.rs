//! # Formula parser
//!
//! Turns canonical formula text into a [`FormulaExpr`]. The grammar is deliberately tiny:
//!
//! ```text
//! expression := term (("+" | "-") term)*
//! term       := unary (("*" | "/" | "%") unary)*
//! unary      := ("-" | "+") unary | power
//! power      := atom ("**" unary)?                  right associative
//! atom       := number
//!             | identifier "(" [expression ("," expression)*] ")"
//!             | identifier
//!             | "(" expression ")"
//! ```
//!
//! Runs of `+ -` and of `* /` are built as balanced trees rather than folded to the left,
//! so the tree depth grows with the logarithm of a flat sum, not its length. `%` closes
//! the run on its left and counts as one nesting level.
//!
//! Only spaces and tabs separate tokens, so a newline ends the formula and anything
//! after it is rejected. Every rejection says where parsing stopped and, when the text
//! there looks like a known construct (a string, a list, `.attr`, `x = 1`, `lambda`),
//! names it.
//!
//! search recursion diagram for "x - x**3/2"
//! ```text
//!   expression  x | - | x**3/2
//!                \|/      \|/
//!   term         x     x**3 | / | 2
//!                        \|/
//!   power              x | ** | 3
//! ```
use crate::symbolic::syntax_tree::{BinaryOperator, FormulaExpr};
use crate::symbolic::validator::MAX_TREE_DEPTH;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, one_of, space0},
    combinator::{all_consuming, cut, map, map_res, not, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{pair, preceded, terminated},
};
use std::fmt;
use strum_macros::Display;

/// parentheses, call arguments, unary signs and exponents may nest this deep
pub const MAX_NESTING_DEPTH: usize = 64;

/// words that start statements or control flow elsewhere; never a name in a formula
const RESERVED_WORDS: [&str; 16] = [
    "and", "def", "else", "fn", "for", "from", "if", "import", "in", "is", "lambda", "let",
    "not", "or", "return", "while",
];

/// true for words that can never be a name in a formula
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

type PResult<'a, O> = IResult<&'a str, O>;

/// Constructs that are recognized only to be refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ForbiddenConstruct {
    #[strum(to_string = "string literal")]
    StringLiteral,
    #[strum(to_string = "collection literal")]
    CollectionLiteral,
    #[strum(to_string = "indexing")]
    Indexing,
    #[strum(to_string = "attribute access")]
    AttributeAccess,
    #[strum(to_string = "assignment")]
    Assignment,
    #[strum(to_string = "comparison")]
    Comparison,
    #[strum(to_string = "multiple statements")]
    MultipleStatements,
    #[strum(to_string = "multiple expressions")]
    MultipleExpressions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    Empty,
    UnexpectedEnd,
    UnexpectedToken(String),
    ReservedWord(String),
    Forbidden(ForbiddenConstruct),
    TooDeep { limit: usize },
}

/// where and why the canonical text was rejected; `position` is a byte offset
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: usize, kind: ParseErrorKind) -> Self {
        ParseError { position, kind }
    }

    /// builds the error from the point where nom gave up
    fn from_nom(source: &str, error: Error<&str>) -> Self {
        let position = source.len() - error.input.len();
        if error.code == ErrorKind::TooLarge {
            return ParseError::new(
                position,
                ParseErrorKind::TooDeep {
                    limit: MAX_NESTING_DEPTH,
                },
            );
        }
        classify(source, position)
    }

    pub fn forbidden(&self) -> Option<ForbiddenConstruct> {
        match self.kind {
            ParseErrorKind::Forbidden(construct) => Some(construct),
            _ => None,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseErrorKind::Empty => write!(f, "nothing to parse"),
            ParseErrorKind::UnexpectedEnd => write!(f, "unexpected end of formula"),
            ParseErrorKind::UnexpectedToken(token) => write!(f, "unexpected `{}`", token),
            ParseErrorKind::ReservedWord(word) => {
                write!(f, "`{}` is a reserved word, not a formula", word)
            }
            ParseErrorKind::Forbidden(construct) => {
                write!(f, "{} is not allowed in a formula", construct)
            }
            ParseErrorKind::TooDeep { limit } => {
                write!(f, "formula is nested deeper than {} levels", limit)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)
    }
}

impl std::error::Error for ParseError {}

/// Parses one canonical expression; the whole input must be consumed.
///
/// # Examples
/// ```
/// use RustedGrapher::symbolic::parse_formula::parse_formula;
/// use RustedGrapher::symbolic::syntax_tree::{BinaryOperator, FormulaExpr};
/// let tree = parse_formula("x**2").unwrap();
/// assert_eq!(
///     tree,
///     FormulaExpr::binary(BinaryOperator::Pow, FormulaExpr::name("x"), FormulaExpr::Constant(2.0))
/// );
/// assert!(parse_formula("x = 2").is_err());
/// ```
pub fn parse_formula(canonical: &str) -> Result<FormulaExpr, ParseError> {
    if canonical.trim().is_empty() {
        return Err(ParseError::new(0, ParseErrorKind::Empty));
    }
    let mut parser = all_consuming(terminated(|i| expression(i, 0), space0));
    match parser.parse(canonical) {
        Ok((_, tree)) if tree.depth() > MAX_TREE_DEPTH => Err(ParseError::new(
            0,
            ParseErrorKind::TooDeep {
                limit: MAX_TREE_DEPTH,
            },
        )),
        Ok((_, tree)) => Ok(tree),
        Err(nom::Err::Error(error)) | Err(nom::Err::Failure(error)) => {
            Err(ParseError::from_nom(canonical, error))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::new(
            canonical.len(),
            ParseErrorKind::UnexpectedEnd,
        )),
    }
}

fn too_deep(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Failure(Error::new(input, ErrorKind::TooLarge))
}

/// `a - (b ...)` is `a - b ...` with every following `+`/`-` swapped, same for `/` and `*`
fn regrouped(head: BinaryOperator, next: BinaryOperator) -> BinaryOperator {
    match (head, next) {
        (BinaryOperator::Sub, BinaryOperator::Add) => BinaryOperator::Sub,
        (BinaryOperator::Sub, BinaryOperator::Sub) => BinaryOperator::Add,
        (BinaryOperator::Div, BinaryOperator::Mul) => BinaryOperator::Div,
        (BinaryOperator::Div, BinaryOperator::Div) => BinaryOperator::Mul,
        (_, next) => next,
    }
}

/// Builds the left-to-right chain `first op1 a1 op2 a2 ...` of `+ -` (or `* /`) operators
/// as a balanced tree: `a - b - c + d` becomes `(a - b) - (c - d)`. The depth grows with
/// log2 of the chain length, so a long flat sum never makes a deep tree.
fn balanced_chain(first: FormulaExpr, mut rest: Vec<(BinaryOperator, FormulaExpr)>) -> FormulaExpr {
    let mut right = rest.split_off(rest.len() / 2).into_iter();
    let left = if rest.is_empty() {
        first
    } else {
        balanced_chain(first, rest)
    };
    match right.next() {
        None => left,
        Some((op, head)) => {
            let tail = right
                .map(|(next, operand)| (regrouped(op, next), operand))
                .collect();
            FormulaExpr::binary(op, left, balanced_chain(head, tail))
        }
    }
}

fn expression(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    let (input, first) = term(input, depth)?;
    let (input, rest) = many0(pair(
        preceded(space0, additive_operator),
        cut(|i| term(i, depth)),
    ))
    .parse(input)?;
    Ok((input, balanced_chain(first, rest)))
}

/// `*` and `/` runs are balanced; `%` takes everything on its left as one operand and
/// counts as a nesting level
fn term(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    let (mut input, mut head) = unary(input, depth)?;
    let mut depth = depth;
    let mut run = Vec::new();
    loop {
        let (rest, op) = match preceded(space0, multiplicative_operator).parse(input) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        };
        if op == BinaryOperator::Rem {
            depth += 1;
        }
        let (rest, operand) = cut(|i| unary(i, depth)).parse(rest)?;
        if op == BinaryOperator::Rem {
            let left = balanced_chain(head, std::mem::take(&mut run));
            head = FormulaExpr::binary(BinaryOperator::Rem, left, operand);
        } else {
            run.push((op, operand));
        }
        input = rest;
    }
    Ok((input, balanced_chain(head, run)))
}

fn additive_operator(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        value(BinaryOperator::Add, char('+')),
        value(BinaryOperator::Sub, char('-')),
    ))
    .parse(input)
}

// `**` belongs to `power`, `//` is not an operator here
fn multiplicative_operator(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        value(BinaryOperator::Mul, terminated(char('*'), not(char('*')))),
        value(BinaryOperator::Div, terminated(char('/'), not(char('/')))),
        value(BinaryOperator::Rem, char('%')),
    ))
    .parse(input)
}

fn unary(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    if depth > MAX_NESTING_DEPTH {
        return Err(too_deep(input));
    }
    let (input, _) = space0(input)?;
    alt((
        |i| negation(i, depth),
        |i| unary_plus(i, depth),
        |i| power(i, depth),
    ))
    .parse(input)
}

fn negation(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    let (input, _) = char('-').parse(input)?;
    let (input, operand) = cut(|i| unary(i, depth + 1)).parse(input)?;
    Ok((input, operand.negated()))
}

fn unary_plus(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    let (input, _) = char('+').parse(input)?;
    cut(|i| unary(i, depth + 1)).parse(input)
}

fn power(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    let (input, base) = atom(input, depth)?;
    let (input, exponent) = opt(preceded(
        pair(space0, tag("**")),
        cut(|i| unary(i, depth + 1)),
    ))
    .parse(input)?;
    let expr = match exponent {
        Some(exponent) => FormulaExpr::binary(BinaryOperator::Pow, base, exponent),
        None => base,
    };
    Ok((input, expr))
}

fn atom(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    alt((
        map(number, FormulaExpr::Constant),
        |i| call_or_name(i, depth),
        |i| parenthesized(i, depth),
    ))
    .parse(input)
}

/// `12`, `1.5`, `.5`, `2.`, `6.02e23`; signs are handled by `unary`
fn number(input: &str) -> PResult<'_, f64> {
    map_res(
        recognize((
            alt((
                recognize((digit1, opt((char('.'), digit0)))),
                recognize((char('.'), digit1)),
            )),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
        |literal: &str| literal.parse::<f64>(),
    )
    .parse(input)
}

fn identifier(input: &str) -> PResult<'_, &str> {
    let (rest, word) = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)?;
    if is_reserved_word(word) {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify)));
    }
    Ok((rest, word))
}

fn call_or_name(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    let (rest, name) = identifier(input)?;
    let (after_space, _) = space0(rest)?;
    if !after_space.starts_with('(') {
        return Ok((rest, FormulaExpr::name(name)));
    }
    if depth >= MAX_NESTING_DEPTH {
        return Err(too_deep(after_space));
    }
    let (rest, args) = preceded(
        char('('),
        cut(terminated(
            separated_list0(preceded(space0, char(',')), |i| {
                expression(i, depth + 1)
            }),
            preceded(space0, char(')')),
        )),
    )
    .parse(after_space)?;
    Ok((rest, FormulaExpr::call(name, args)))
}

fn parenthesized(input: &str, depth: usize) -> PResult<'_, FormulaExpr> {
    let (inner, _) = char('(').parse(input)?;
    if depth >= MAX_NESTING_DEPTH {
        return Err(too_deep(input));
    }
    cut(terminated(
        |i| expression(i, depth + 1),
        preceded(space0, char(')')),
    ))
    .parse(inner)
}

/// names the construct found at `position`
fn classify(source: &str, position: usize) -> ParseError {
    let rest = &source[position..];
    // only spaces and tabs, a newline is itself the offending token
    let trimmed = rest.trim_start_matches([' ', '\t']);
    let position = position + (rest.len() - trimmed.len());
    let previous = source[..position].trim_end().chars().last();
    let forbidden = |construct| ParseError::new(position, ParseErrorKind::Forbidden(construct));
    match trimmed.chars().next() {
        None => ParseError::new(position, ParseErrorKind::UnexpectedEnd),
        Some('"') | Some('\'') => forbidden(ForbiddenConstruct::StringLiteral),
        Some('{') => forbidden(ForbiddenConstruct::CollectionLiteral),
        Some('[') => match previous {
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, '_' | ')' | ']') => {
                forbidden(ForbiddenConstruct::Indexing)
            }
            _ => forbidden(ForbiddenConstruct::CollectionLiteral),
        },
        Some('.') => forbidden(ForbiddenConstruct::AttributeAccess),
        Some('=') if trimmed.starts_with("==") => forbidden(ForbiddenConstruct::Comparison),
        Some('=') => forbidden(ForbiddenConstruct::Assignment),
        Some('!') if trimmed.starts_with("!=") => forbidden(ForbiddenConstruct::Comparison),
        Some('<') | Some('>') => forbidden(ForbiddenConstruct::Comparison),
        Some(';') | Some('\n') | Some('\r') => forbidden(ForbiddenConstruct::MultipleStatements),
        Some(',') => forbidden(ForbiddenConstruct::MultipleExpressions),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            let word: String = trimmed
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if is_reserved_word(&word) {
                ParseError::new(position, ParseErrorKind::ReservedWord(word))
            } else {
                ParseError::new(position, ParseErrorKind::UnexpectedToken(word))
            }
        }
        Some(c) => ParseError::new(position, ParseErrorKind::UnexpectedToken(c.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BinaryOperator::*;

    fn x() -> FormulaExpr {
        FormulaExpr::name("x")
    }

    fn c(value: f64) -> FormulaExpr {
        FormulaExpr::Constant(value)
    }

    fn bin(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
        FormulaExpr::binary(op, left, right)
    }

    fn kind_of(input: &str) -> ParseErrorKind {
        parse_formula(input).unwrap_err().kind
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_formula("42").unwrap(), c(42.0));
        assert_eq!(parse_formula("1.5").unwrap(), c(1.5));
        assert_eq!(parse_formula(".5").unwrap(), c(0.5));
        assert_eq!(parse_formula("6.02e23").unwrap(), c(6.02e23));
        assert_eq!(parse_formula("1E-3").unwrap(), c(0.001));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_formula("x").unwrap(), x());
        assert_eq!(parse_formula("  pi ").unwrap(), FormulaExpr::name("pi"));
        assert_eq!(parse_formula("_t1").unwrap(), FormulaExpr::name("_t1"));
    }

    #[test]
    fn test_parse_addition_and_subtraction() {
        assert_eq!(parse_formula("x + 2").unwrap(), bin(Add, x(), c(2.0)));
        assert_eq!(
            parse_formula("x - 1 - 2").unwrap(),
            bin(Sub, bin(Sub, x(), c(1.0)), c(2.0))
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse_formula("1 + 2 * x").unwrap(),
            bin(Add, c(1.0), bin(Mul, c(2.0), x()))
        );
        assert_eq!(
            parse_formula("(1 + 2) * x").unwrap(),
            bin(Mul, bin(Add, c(1.0), c(2.0)), x())
        );
        assert_eq!(
            parse_formula("x / 2 % 3").unwrap(),
            bin(Rem, bin(Div, x(), c(2.0)), c(3.0))
        );
    }

    #[test]
    fn test_parse_power() {
        assert_eq!(parse_formula("x**2").unwrap(), bin(Pow, x(), c(2.0)));
        // right associative
        assert_eq!(
            parse_formula("2**3**2").unwrap(),
            bin(Pow, c(2.0), bin(Pow, c(3.0), c(2.0)))
        );
        // binds tighter than unary minus on its left, accepts one on its right
        assert_eq!(
            parse_formula("-x**2").unwrap(),
            bin(Mul, c(-1.0), bin(Pow, x(), c(2.0)))
        );
        assert_eq!(parse_formula("2**-1").unwrap(), bin(Pow, c(2.0), c(-1.0)));
        assert_eq!(
            parse_formula("x ** 2 * 3").unwrap(),
            bin(Mul, bin(Pow, x(), c(2.0)), c(3.0))
        );
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(parse_formula("-3").unwrap(), c(-3.0));
        assert_eq!(parse_formula("--3").unwrap(), c(3.0));
        assert_eq!(parse_formula("+x").unwrap(), x());
        assert_eq!(
            parse_formula("x*-x").unwrap(),
            bin(Mul, x(), bin(Mul, c(-1.0), x()))
        );
    }

    #[test]
    fn test_parse_calls() {
        assert_eq!(
            parse_formula("sin(x)").unwrap(),
            FormulaExpr::call("sin", vec![x()])
        );
        assert_eq!(
            parse_formula("log(64, 2)").unwrap(),
            FormulaExpr::call("log", vec![c(64.0), c(2.0)])
        );
        assert_eq!(
            parse_formula("sin(cos(x))").unwrap(),
            FormulaExpr::call("sin", vec![FormulaExpr::call("cos", vec![x()])])
        );
        assert_eq!(parse_formula("f()").unwrap(), FormulaExpr::call("f", vec![]));
        assert_eq!(
            parse_formula("sin (x) + 1").unwrap(),
            bin(Add, FormulaExpr::call("sin", vec![x()]), c(1.0))
        );
    }

    #[test]
    fn test_parse_taylor_polynomial() {
        let tree = parse_formula("1 - ((x**2)/factorial(2)) + (x**4)/factorial(4)").unwrap();
        let expected = bin(
            Add,
            bin(
                Sub,
                c(1.0),
                bin(
                    Div,
                    bin(Pow, x(), c(2.0)),
                    FormulaExpr::call("factorial", vec![c(2.0)]),
                ),
            ),
            bin(
                Div,
                bin(Pow, x(), c(4.0)),
                FormulaExpr::call("factorial", vec![c(4.0)]),
            ),
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["x - x**3/factorial(3)", "-sin(x)**2 + log(x, 2)", "2**3**2 % x"] {
            let tree = parse_formula(text).unwrap();
            assert_eq!(parse_formula(&tree.to_string()).unwrap(), tree);
        }
    }

    #[test]
    fn test_rejects_forbidden_constructs() {
        use ForbiddenConstruct::*;
        let cases = [
            ("'rm -rf'", StringLiteral),
            ("\"x\"", StringLiteral),
            ("[1, 2]", CollectionLiteral),
            ("{1: 2}", CollectionLiteral),
            ("x + [1]", CollectionLiteral),
            ("x[0]", Indexing),
            ("sin(x)[0]", Indexing),
            ("x.real", AttributeAccess),
            ("sin.__globals__", AttributeAccess),
            ("x = 1", Assignment),
            ("log(64, base=2)", Assignment),
            ("x == 1", Comparison),
            ("x < 1", Comparison),
            ("x; x", MultipleStatements),
            ("x\nx", MultipleStatements),
            ("x, x", MultipleExpressions),
            ("__import__('os')", StringLiteral),
            ("eval(\"1\")", StringLiteral),
        ];
        for (input, construct) in cases {
            let error = parse_formula(input).unwrap_err();
            assert_eq!(error.forbidden(), Some(construct), "input: {}", input);
        }
    }

    #[test]
    fn test_rejects_reserved_words() {
        assert_eq!(
            kind_of("lambda: 0"),
            ParseErrorKind::ReservedWord("lambda".to_string())
        );
        assert_eq!(
            kind_of("(lambda y: y)(2)"),
            ParseErrorKind::ReservedWord("lambda".to_string())
        );
        assert_eq!(
            kind_of("x if x else 1"),
            ParseErrorKind::ReservedWord("if".to_string())
        );
        assert_eq!(
            kind_of("import os"),
            ParseErrorKind::ReservedWord("import".to_string())
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(kind_of(""), ParseErrorKind::Empty);
        assert_eq!(kind_of("(x +"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind_of("(x + y"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind_of("x +"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind_of("2^4"), ParseErrorKind::UnexpectedToken("^".to_string()));
        assert_eq!(kind_of("2x"), ParseErrorKind::UnexpectedToken("x".to_string()));
        assert_eq!(kind_of("x // 2"), ParseErrorKind::UnexpectedToken("/".to_string()));
        assert_eq!(kind_of("x $ 2"), ParseErrorKind::UnexpectedToken("$".to_string()));
        assert!(parse_formula("f(x,)").is_err());
        assert!(parse_formula("x ** ").is_err());
        assert!(parse_formula("()").is_err());
    }

    #[test]
    fn test_error_position() {
        let error = parse_formula("sin(x) + x.imag").unwrap_err();
        assert_eq!(error.position, 10);
        assert_eq!(
            error.to_string(),
            "attribute access is not allowed in a formula at position 10"
        );
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}x{}", "(".repeat(30), ")".repeat(30));
        assert_eq!(parse_formula(&ok).unwrap(), x());

        let deep = format!("{}x{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(
            kind_of(&deep),
            ParseErrorKind::TooDeep {
                limit: MAX_NESTING_DEPTH
            }
        );
        let calls = format!("{}x{}", "sin(".repeat(100), ")".repeat(100));
        assert!(matches!(kind_of(&calls), ParseErrorKind::TooDeep { .. }));
        let signs = format!("{}x", "-".repeat(500));
        assert!(matches!(kind_of(&signs), ParseErrorKind::TooDeep { .. }));
    }

    #[test]
    fn test_long_chains_are_balanced() {
        assert_eq!(
            parse_formula("x - 1 - 2 + 3").unwrap(),
            bin(Sub, bin(Sub, x(), c(1.0)), bin(Sub, c(2.0), c(3.0)))
        );
        assert_eq!(
            parse_formula("x / 2 * 3 / 4").unwrap(),
            bin(Mul, bin(Div, x(), c(2.0)), bin(Div, c(3.0), c(4.0)))
        );
        // x - 1 - 2 - 3 is (x - 1) - (2 + 3)
        assert_eq!(
            parse_formula("x - 1 - 2 - 3").unwrap(),
            bin(Sub, bin(Sub, x(), c(1.0)), bin(Add, c(2.0), c(3.0)))
        );
        assert_eq!(
            parse_formula("x / 2 / 3 / 4").unwrap(),
            bin(Div, bin(Div, x(), c(2.0)), bin(Mul, c(3.0), c(4.0)))
        );
        assert_eq!(
            parse_formula("x * 2 / 3 % 4 * 5").unwrap(),
            bin(Mul, bin(Rem, bin(Div, bin(Mul, x(), c(2.0)), c(3.0)), c(4.0)), c(5.0))
        );

        let sum = vec!["x"; 200_000].join(" + ");
        let tree = parse_formula(&sum).unwrap();
        assert!(tree.depth() <= 20, "depth {}", tree.depth());
        let product = vec!["x"; 200_000].join("*");
        assert!(parse_formula(&product).unwrap().depth() <= 20);
    }

    #[test]
    fn test_remainder_chain_counts_as_nesting() {
        let ok = format!("x{}", " % 2".repeat(30));
        assert_eq!(parse_formula(&ok).unwrap().depth(), 31);
        let long = format!("x{}", " % 2".repeat(5_000));
        assert!(matches!(kind_of(&long), ParseErrorKind::TooDeep { .. }));
    }
}

//! # Normalizer
//!
//! Rewrites a human-written formula into the canonical text the parser accepts:
//!
//! 1. `^` becomes the canonical power token `**` (`2^4` -> `2**4`)
//! 2. a formula that never mentions the variable is made to depend on it, so that it
//!    plots as a flat line over the whole domain (see [`BroadcastStrategy`])
//! 3. implicit-function shorthand is expanded (`sinx` -> `sin(x)`, `lnx` -> `ln(x)`)
//!
//! Numeric literals are skipped while scanning identifiers, so `2e5` is left alone.
//! Already-canonical text that mentions the variable comes back unchanged.
use crate::symbolic::function_library::FunctionLibrary;
use crate::symbolic::syntax_tree::is_identifier;
use log::debug;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use strum_macros::{Display, EnumString};

pub const CANONICAL_POWER: &str = "**";
pub const DEFAULT_VARIABLE: &str = "x";
pub const DEFAULT_MAX_FORMULA_LENGTH: usize = 4096;
/// highest `max_formula_length` a grapher accepts
pub const MAX_FORMULA_LENGTH_LIMIT: usize = 65_536;

// numbers first, so the exponent of `2e5` is never taken for an identifier
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?|[A-Za-z_][A-Za-z0-9_]*").unwrap()
});

/// How a formula without the variable (`2^4`, `pi/2`) is spread over the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BroadcastStrategy {
    /// Rewrite the text to `(<formula>)*(x/x)`. The result is undefined where the
    /// variable is zero (0/0), which shows up as NaN or as a division-by-zero failure
    /// under the strict policy.
    #[strum(serialize = "identity")]
    IdentityTerm,
    /// Leave the text alone; the evaluator fills the scalar result across the domain.
    #[default]
    Fill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerSettings {
    /// name the domain is bound to
    pub variable: String,
    pub broadcast: BroadcastStrategy,
    /// longer formulas are refused before any rewriting
    pub max_formula_length: usize,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        NormalizerSettings {
            variable: DEFAULT_VARIABLE.to_string(),
            broadcast: BroadcastStrategy::default(),
            max_formula_length: DEFAULT_MAX_FORMULA_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizationError {
    EmptyFormula,
    TooLong { length: usize, limit: usize },
    /// `sinxy`: sin(x)*y or sin(xy)?
    AmbiguousShorthand {
        token: String,
        function: &'static str,
        variable: String,
    },
}

impl fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NormalizationError::EmptyFormula => write!(f, "formula is empty"),
            NormalizationError::TooLong { length, limit } => write!(
                f,
                "formula is {} characters long, the limit is {}",
                length, limit
            ),
            NormalizationError::AmbiguousShorthand {
                token,
                function,
                variable,
            } => write!(
                f,
                "`{}` starts with the shorthand `{}{}` but continues; write `{}({})` explicitly",
                token, function, variable, function, variable
            ),
        }
    }
}

impl std::error::Error for NormalizationError {}

/// Rewrites `formula` into canonical form.
///
/// # Examples
/// ```
/// use RustedGrapher::symbolic::normalizer::{normalize_formula, NormalizerSettings};
/// let settings = NormalizerSettings::default();
/// assert_eq!(normalize_formula("sinx + x^2", &settings).unwrap(), "sin(x) + x**2");
/// ```
pub fn normalize_formula(
    formula: &str,
    settings: &NormalizerSettings,
) -> Result<String, NormalizationError> {
    if formula.trim().is_empty() {
        return Err(NormalizationError::EmptyFormula);
    }
    if formula.len() > settings.max_formula_length {
        return Err(NormalizationError::TooLong {
            length: formula.len(),
            limit: settings.max_formula_length,
        });
    }
    let variable = settings.variable.as_str();
    let functions = FunctionLibrary::global().function_names();

    let powered = formula.replace('^', CANONICAL_POWER);

    let broadcast = if settings.broadcast == BroadcastStrategy::IdentityTerm
        && !mentions_variable(&powered, variable, &functions)
    {
        format!("({})*({}/{})", powered, variable, variable)
    } else {
        powered
    };

    let canonical = expand_shorthand(&broadcast, variable, &functions)?;
    debug!("normalized `{}` -> `{}`", formula, canonical);
    Ok(canonical)
}

/// true if the variable appears as a name or inside a shorthand token like `sinx`
pub fn mentions_variable(text: &str, variable: &str, functions: &[&'static str]) -> bool {
    identifiers(text).any(|(_, word)| {
        word == variable || shorthand_function(word, variable, functions).is_some()
    })
}

/// identifier tokens with their byte offsets, numeric literals excluded
fn identifiers(text: &str) -> impl Iterator<Item = (usize, &str)> {
    TOKEN
        .find_iter(text)
        .filter(|token| is_identifier(token.as_str()))
        .map(|token| (token.start(), token.as_str()))
}

/// the function `word` abbreviates, if `word` is exactly `<function><variable>`
fn shorthand_function(
    word: &str,
    variable: &str,
    functions: &[&'static str],
) -> Option<&'static str> {
    functions.iter().copied().find(|function| {
        word.len() == function.len() + variable.len()
            && word.starts_with(function)
            && word.ends_with(variable)
    })
}

fn expand_shorthand(
    text: &str,
    variable: &str,
    functions: &[&'static str],
) -> Result<String, NormalizationError> {
    let library = FunctionLibrary::global();
    let mut expanded = String::with_capacity(text.len() + 8);
    let mut copied_up_to = 0;
    for (start, word) in identifiers(text) {
        if word == variable || library.get(word).is_some() {
            continue;
        }
        if let Some(function) = shorthand_function(word, variable, functions) {
            expanded.push_str(&text[copied_up_to..start]);
            expanded.push_str(&format!("{}({})", function, variable));
            copied_up_to = start + word.len();
        } else if let Some(function) = functions
            .iter()
            .copied()
            .find(|function| word.starts_with(&format!("{}{}", function, variable)))
        {
            return Err(NormalizationError::AmbiguousShorthand {
                token: word.to_string(),
                function,
                variable: variable.to_string(),
            });
        }
    }
    expanded.push_str(&text[copied_up_to..]);
    Ok(expanded)
}

//! Failure taxonomy of the grapher.
//!
//! Every stage has its own error type; [`GrapherError`] wraps them so the pipeline can use
//! `?` throughout, and [`FormulaFailure`] pairs an error with the formula it came from for
//! reporting. [`ConfigError`] covers everything that goes wrong before a batch starts.
use crate::grapher::domain::DomainError;
use crate::symbolic::evaluator::EvaluationError;
use crate::symbolic::normalizer::NormalizationError;
use crate::symbolic::parse_formula::ParseError;
use crate::symbolic::validator::ValidationError;
use std::fmt;
use strum_macros::Display;

/// which stage rejected a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FailureKind {
    #[strum(to_string = "normalization failure")]
    Normalization,
    #[strum(to_string = "parse failure")]
    Parse,
    #[strum(to_string = "validation failure")]
    Validation,
    #[strum(to_string = "evaluation failure")]
    Evaluation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GrapherError {
    Normalization(NormalizationError),
    Parse(ParseError),
    Validation(ValidationError),
    Evaluation(EvaluationError),
}

impl GrapherError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GrapherError::Normalization(_) => FailureKind::Normalization,
            GrapherError::Parse(_) => FailureKind::Parse,
            GrapherError::Validation(_) => FailureKind::Validation,
            GrapherError::Evaluation(_) => FailureKind::Evaluation,
        }
    }

    /// true if the formula never reached the evaluator
    pub fn rejected_before_evaluation(&self) -> bool {
        self.kind() != FailureKind::Evaluation
    }
}

impl fmt::Display for GrapherError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrapherError::Normalization(e) => write!(f, "{}: {}", self.kind(), e),
            GrapherError::Parse(e) => write!(f, "{}: {}", self.kind(), e),
            GrapherError::Validation(e) => write!(f, "{}: {}", self.kind(), e),
            GrapherError::Evaluation(e) => write!(f, "{}: {}", self.kind(), e),
        }
    }
}

impl std::error::Error for GrapherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrapherError::Normalization(e) => Some(e),
            GrapherError::Parse(e) => Some(e),
            GrapherError::Validation(e) => Some(e),
            GrapherError::Evaluation(e) => Some(e),
        }
    }
}

impl From<NormalizationError> for GrapherError {
    fn from(e: NormalizationError) -> Self {
        GrapherError::Normalization(e)
    }
}

impl From<ParseError> for GrapherError {
    fn from(e: ParseError) -> Self {
        GrapherError::Parse(e)
    }
}

impl From<ValidationError> for GrapherError {
    fn from(e: ValidationError) -> Self {
        GrapherError::Validation(e)
    }
}

impl From<EvaluationError> for GrapherError {
    fn from(e: EvaluationError) -> Self {
        GrapherError::Evaluation(e)
    }
}

/// user-facing report: what failed, and for which formula
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaFailure {
    pub formula: String,
    pub error: GrapherError,
}

impl FormulaFailure {
    pub fn kind(&self) -> FailureKind {
        self.error.kind()
    }
}

impl fmt::Display for FormulaFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "formula `{}`: {}", self.formula, self.error)
    }
}

impl std::error::Error for FormulaFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// setup problems: bad domain, variable, option values or task documents
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Domain(DomainError),
    InvalidVariable(String),
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
    MissingKey { section: String, key: String },
    UnknownSection(String),
    UnknownKey { section: String, key: String },
    Task(String),
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Domain(e) => write!(f, "invalid domain: {}", e),
            ConfigError::InvalidVariable(name) => write!(
                f,
                "`{}` cannot be the variable: it must be an identifier that is not a library name or a reserved word",
                name
            ),
            ConfigError::InvalidValue {
                section,
                key,
                value,
            } => write!(f, "invalid value `{}` for {}.{}", value, section, key),
            ConfigError::MissingKey { section, key } => {
                write!(f, "missing required key {}.{}", section, key)
            }
            ConfigError::UnknownSection(section) => write!(f, "unknown section `{}`", section),
            ConfigError::UnknownKey { section, key } => {
                write!(f, "unknown key `{}` in section `{}`", key, section)
            }
            ConfigError::Task(message) => write!(f, "malformed task document: {}", message),
            ConfigError::Io(message) => write!(f, "cannot read task file: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<DomainError> for ConfigError {
    fn from(e: DomainError) -> Self {
        ConfigError::Domain(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

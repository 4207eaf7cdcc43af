//! One formula from text to output sequence:
//!
//! ```text
//!  raw text -> normalize -> parse -> validate (gate) -> evaluate -> Array1<f64>
//! ```
//!
//! The first failing stage ends the run; nothing produced by a failed stage reaches the
//! next one.
use crate::grapher::domain::Domain;
use crate::grapher::grapher_error::{ConfigError, GrapherError};
use crate::symbolic::evaluator::{EvalSettings, Environment, evaluate};
use crate::symbolic::function_library::{FunctionLibrary, MAX_ROOT_PRECISION};
use crate::symbolic::normalizer::{MAX_FORMULA_LENGTH_LIMIT, NormalizerSettings, normalize_formula};
use crate::symbolic::parse_formula::{is_reserved_word, parse_formula};
use crate::symbolic::syntax_tree::is_identifier;
use crate::symbolic::validator::{ValidatedFormula, validate_formula};
use log::debug;
use ndarray::Array1;

/// everything that changes how a formula is read and computed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GrapherSettings {
    pub normalizer: NormalizerSettings,
    pub evaluation: EvalSettings,
}

impl GrapherSettings {
    pub fn variable(&self) -> &str {
        &self.normalizer.variable
    }

    /// Settings written straight into the public fields get the same checks as the setters:
    /// the variable must be an identifier that no library name or reserved word shadows,
    /// the length cap and the root precision must be in range.
    pub fn check(&self) -> Result<(), ConfigError> {
        check_variable(self.variable())?;
        check_max_formula_length(self.normalizer.max_formula_length)?;
        check_root_precision(self.evaluation.root_precision)
    }
}

fn invalid_setting(key: &str, value: String) -> ConfigError {
    ConfigError::InvalidValue {
        section: "settings".to_string(),
        key: key.to_string(),
        value,
    }
}

/// 1 to [`MAX_FORMULA_LENGTH_LIMIT`] bytes
pub fn check_max_formula_length(limit: usize) -> Result<(), ConfigError> {
    if limit == 0 || limit > MAX_FORMULA_LENGTH_LIMIT {
        return Err(invalid_setting("max_formula_length", limit.to_string()));
    }
    Ok(())
}

/// at most [`MAX_ROOT_PRECISION`] decimal places
pub fn check_root_precision(decimals: Option<u32>) -> Result<(), ConfigError> {
    match decimals {
        Some(decimals) if decimals > MAX_ROOT_PRECISION => {
            Err(invalid_setting("root_precision", decimals.to_string()))
        }
        _ => Ok(()),
    }
}

pub fn check_variable(variable: &str) -> Result<(), ConfigError> {
    if !is_identifier(variable)
        || is_reserved_word(variable)
        || FunctionLibrary::global().get(variable).is_some()
    {
        return Err(ConfigError::InvalidVariable(variable.to_string()));
    }
    Ok(())
}

/// A formula that passed every check and is ready to be evaluated over any domain
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFormula {
    pub formula: String,
    pub canonical: String,
    validated: ValidatedFormula,
}

impl CompiledFormula {
    pub fn validated(&self) -> &ValidatedFormula {
        &self.validated
    }

    pub fn evaluate(
        &self,
        domain: &Domain,
        settings: &GrapherSettings,
    ) -> Result<Array1<f64>, GrapherError> {
        let env = Environment::new(FunctionLibrary::global(), settings.variable(), domain.view());
        let values = evaluate(&self.validated, &env, &settings.evaluation)?;
        Ok(values)
    }
}

/// normalize, parse and validate
pub fn compile_formula(
    formula: &str,
    settings: &GrapherSettings,
) -> Result<CompiledFormula, GrapherError> {
    let canonical = normalize_formula(formula, &settings.normalizer)?;
    let tree = parse_formula(&canonical)?;
    let validated = validate_formula(tree, FunctionLibrary::global())?;
    debug!("compiled `{}` into {}", formula, validated);
    Ok(CompiledFormula {
        formula: formula.to_string(),
        canonical,
        validated,
    })
}

/// the whole pipeline for one formula
///
/// # Examples
/// ```
/// use RustedGrapher::grapher::domain::Domain;
/// use RustedGrapher::grapher::pipeline::{evaluate_formula, GrapherSettings};
/// let domain = Domain::new(0.0, 2.0, 1.0).unwrap();
/// let values = evaluate_formula("x^2", &domain, &GrapherSettings::default()).unwrap();
/// assert_eq!(values.to_vec(), vec![0.0, 1.0, 4.0]);
/// ```
pub fn evaluate_formula(
    formula: &str,
    domain: &Domain,
    settings: &GrapherSettings,
) -> Result<Array1<f64>, GrapherError> {
    compile_formula(formula, settings)?.evaluate(domain, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grapher::grapher_error::FailureKind;

    #[test]
    fn test_compile_keeps_canonical_text() {
        let compiled = compile_formula("sinx^2", &GrapherSettings::default()).unwrap();
        assert_eq!(compiled.formula, "sinx^2");
        assert_eq!(compiled.canonical, "sin(x)**2");
        assert_eq!(compiled.validated().to_string(), "(sin(x) ** 2.0)");
    }

    #[test]
    fn test_stage_of_each_failure() {
        let settings = GrapherSettings::default();
        let cases = [
            ("", FailureKind::Normalization),
            ("sinxy", FailureKind::Normalization),
            ("x = 1", FailureKind::Parse),
            ("__import__('os')", FailureKind::Parse),
            ("system(x)", FailureKind::Validation),
            ("pi(x)", FailureKind::Validation),
        ];
        for (formula, kind) in cases {
            let error = compile_formula(formula, &settings).unwrap_err();
            assert_eq!(error.kind(), kind, "formula: {}", formula);
        }
        let domain = Domain::new(-1.0, 1.0, 1.0).unwrap();
        let error = evaluate_formula("1/x", &domain, &settings).unwrap_err();
        assert_eq!(error.kind(), FailureKind::Evaluation);
    }

    #[test]
    fn test_compiled_formula_is_reusable() {
        let settings = GrapherSettings::default();
        let compiled = compile_formula("2*x", &settings).unwrap();
        let small = Domain::new(0.0, 1.0, 0.5).unwrap();
        let large = Domain::linspace(0.0, 1.0, 101).unwrap();
        assert_eq!(compiled.evaluate(&small, &settings).unwrap().to_vec(), vec![0.0, 1.0, 2.0]);
        assert_eq!(compiled.evaluate(&large, &settings).unwrap().len(), 101);
    }

    #[test]
    fn test_check_variable() {
        assert!(check_variable("x").is_ok());
        assert!(check_variable("t_1").is_ok());
        for bad in ["", "1x", "pi", "sin", "lambda", "x y", "x.y"] {
            assert_eq!(
                check_variable(bad),
                Err(ConfigError::InvalidVariable(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_settings_check() {
        assert!(GrapherSettings::default().check().is_ok());

        let mut settings = GrapherSettings::default();
        settings.normalizer.variable = "sin".to_string();
        assert_eq!(
            settings.check(),
            Err(ConfigError::InvalidVariable("sin".to_string()))
        );

        let mut settings = GrapherSettings::default();
        settings.normalizer.max_formula_length = MAX_FORMULA_LENGTH_LIMIT + 1;
        assert!(matches!(
            settings.check(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "max_formula_length"
        ));
        settings.normalizer.max_formula_length = MAX_FORMULA_LENGTH_LIMIT;
        assert!(settings.check().is_ok());
        assert!(check_max_formula_length(0).is_err());

        let mut settings = GrapherSettings::default();
        settings.evaluation.root_precision = Some(309);
        assert!(matches!(
            settings.check(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "root_precision"
        ));
        assert!(check_root_precision(Some(MAX_ROOT_PRECISION)).is_ok());
        assert!(check_root_precision(None).is_ok());
    }

    #[test]
    fn test_long_flat_sum_evaluates() {
        let settings = GrapherSettings::default();
        let domain = Domain::new(0.0, 2.0, 1.0).unwrap();
        // 1500 terms fit the default length cap
        let sum = vec!["x"; 1500].join("+");
        assert!(sum.len() <= settings.normalizer.max_formula_length);
        let values = evaluate_formula(&sum, &domain, &settings).unwrap();
        assert_eq!(values.to_vec(), vec![0.0, 1500.0, 3000.0]);

        let mut settings = GrapherSettings::default();
        settings.normalizer.max_formula_length = MAX_FORMULA_LENGTH_LIMIT;
        let sum = vec!["x"; 30_000].join("-");
        assert!(sum.len() <= MAX_FORMULA_LENGTH_LIMIT);
        let values = evaluate_formula(&sum, &domain, &settings).unwrap();
        assert_eq!(values.to_vec(), vec![0.0, -29_998.0, -59_996.0]);
    }
}

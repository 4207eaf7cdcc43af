//! # Grapher task documents
//!
//! Builds a [`Grapher`] from a text document in the task format of
//! [`crate::Utils::task_parser`]:
//!
//! ```text
//! formulas
//!     f: "sin(x)", "1 - x^2/factorial(2) + x^4/factorial(4)"
//! domain
//!     lower: -3 upper: 3 step: 0.01
//! settings
//!     variable: x broadcast: fill policy: strict root_precision: 2 parallel: false
//! logging
//!     loglevel: info log_to_file: false
//! ```
//!
//! Only `formulas.f` is required. `domain` takes either `step` or `points` (number of
//! evenly spaced points, both bounds included); without them the step is 0.01 and without
//! bounds the domain is [-50, 50]. Unknown sections and keys are errors, so a typo never
//! silently falls back to a default.
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, parse_document_as};
use crate::grapher::domain::{DEFAULT_LOWER, DEFAULT_STEP, DEFAULT_UPPER};
use crate::grapher::grapher_api::Grapher;
use crate::grapher::grapher_error::ConfigError;
use crate::symbolic::normalizer::BroadcastStrategy;
use crate::symbolic::value::NumericPolicy;
use log::info;
use std::collections::HashMap;
use std::fs;
use std::str::FromStr;

/// every section and key a task document may contain
pub const TASK_KEYS: [(&str, &[&str]); 4] = [
    ("formulas", &["f"]),
    ("domain", &["lower", "upper", "step", "points"]),
    (
        "settings",
        &[
            "variable",
            "broadcast",
            "policy",
            "root_precision",
            "max_formula_length",
            "parallel",
        ],
    ),
    ("logging", &["loglevel", "log_to_file"]),
];

/// commented example written by [`create_template_file`]
pub const TASK_TEMPLATE: &str = r#"# formulas to plot, quoted when they contain spaces or commas
formulas
    f: "sin(x)", "1 - x^2/factorial(2) + x^4/factorial(4)", lnx
# sample points: lower, upper and either step or points
domain
    lower: -3 upper: 3 step: 0.01
# broadcast: fill or identity; policy: strict or propagate
settings
    variable: x broadcast: fill policy: strict root_precision: 2 parallel: false
# loglevel: debug, info, warn, error or off
logging
    loglevel: info log_to_file: false
"#;

/// template for `parse_document_as`: all known keys, none of them set
pub fn task_template() -> DocumentMap {
    TASK_KEYS
        .iter()
        .map(|(section, keys)| {
            let keys: SectionMap = keys.iter().map(|key| (key.to_string(), None)).collect();
            (section.to_string(), keys)
        })
        .collect()
}

pub fn create_template_file(path: &str) -> std::io::Result<()> {
    fs::write(path, TASK_TEMPLATE)
}

/// read access to one section of a parsed document, with the section name kept for errors
struct Section<'a> {
    name: &'a str,
    entries: Option<&'a SectionMap>,
}

impl<'a> Section<'a> {
    fn values(&self, key: &str) -> Option<&'a Vec<Value>> {
        self.entries
            .and_then(|entries| entries.get(key))
            .and_then(|values| values.as_ref())
    }

    fn invalid(&self, key: &str, value: String) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.name.to_string(),
            key: key.to_string(),
            value,
        }
    }

    /// the only value of `key`, None when the key is absent
    fn single(&self, key: &str) -> Result<Option<&'a Value>, ConfigError> {
        match self.values(key).map(|values| values.as_slice()) {
            None => Ok(None),
            Some([value]) => Ok(Some(value)),
            Some(values) => Err(self.invalid(
                key,
                values
                    .iter()
                    .map(Value::to_string_value)
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        match self.single(key)? {
            None => Ok(None),
            Some(value) => value
                .as_number()
                .map(Some)
                .ok_or_else(|| self.invalid(key, value.to_string_value())),
        }
    }

    fn count(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        match self.single(key)? {
            None => Ok(None),
            Some(value) => value
                .as_integer()
                .and_then(|n| u64::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(key, value.to_string_value())),
        }
    }

    fn boolean(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.single(key)? {
            None => Ok(None),
            Some(value) => value
                .as_boolean()
                .map(Some)
                .ok_or_else(|| self.invalid(key, value.to_string_value())),
        }
    }

    fn text(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.single(key)?.map(Value::to_string_value))
    }

    /// a value parsed through `FromStr`, e.g. a strum enum
    fn option<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.text(key)? {
            None => Ok(None),
            Some(text) => T::from_str(&text.to_lowercase())
                .map(Some)
                .map_err(|_| self.invalid(key, text)),
        }
    }
}

fn check_known_keys(document: &DocumentMap) -> Result<(), ConfigError> {
    let known: HashMap<&str, &[&str]> = TASK_KEYS.iter().copied().collect();
    for (section, entries) in document {
        let keys = known
            .get(section.as_str())
            .ok_or_else(|| ConfigError::UnknownSection(section.clone()))?;
        if let Some(key) = entries.keys().find(|key| !keys.contains(&key.as_str())) {
            return Err(ConfigError::UnknownKey {
                section: section.clone(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}

impl Grapher {
    /// Applies a parsed task document; keys the document does not set keep their current values.
    /// A document with any bad entry changes nothing.
    pub fn set_params_from_hashmap(&mut self, document: DocumentMap) -> Result<(), ConfigError> {
        let mut updated = self.clone();
        updated.apply_document(&document)?;
        *self = updated;
        Ok(())
    }

    fn apply_document(&mut self, document: &DocumentMap) -> Result<(), ConfigError> {
        check_known_keys(document)?;
        let section = |name: &'static str| Section {
            name,
            entries: document.get(name),
        };

        let formulas = section("formulas");
        let listed = formulas
            .values("f")
            .filter(|values| !values.is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                section: "formulas".to_string(),
                key: "f".to_string(),
            })?;
        self.formulas = listed.iter().map(Value::to_string_value).collect();

        let domain = section("domain");
        let lower = domain.number("lower")?.unwrap_or(DEFAULT_LOWER);
        let upper = domain.number("upper")?.unwrap_or(DEFAULT_UPPER);
        match (domain.number("step")?, domain.count("points")?) {
            (Some(_), Some(_)) => {
                return Err(domain.invalid("points", "step and points are exclusive".to_string()));
            }
            (None, Some(points)) => self.set_linspace(lower, upper, points as usize)?,
            (step, None) => self.set_domain(lower, upper, step.unwrap_or(DEFAULT_STEP))?,
        }

        let settings = section("settings");
        if let Some(variable) = settings.text("variable")? {
            self.set_variable(&variable)?;
        }
        if let Some(broadcast) = settings.option::<BroadcastStrategy>("broadcast")? {
            self.set_broadcast(broadcast);
        }
        if let Some(policy) = settings.option::<NumericPolicy>("policy")? {
            self.set_policy(policy);
        }
        if let Some(decimals) = settings.count("root_precision")? {
            let decimals = u32::try_from(decimals)
                .map_err(|_| settings.invalid("root_precision", decimals.to_string()))?;
            self.set_root_precision(Some(decimals))?;
        }
        if let Some(limit) = settings.count("max_formula_length")? {
            let limit = usize::try_from(limit)
                .map_err(|_| settings.invalid("max_formula_length", limit.to_string()))?;
            self.set_max_formula_length(limit)?;
        }
        if let Some(parallel) = settings.boolean("parallel")? {
            self.set_parallel(parallel);
        }

        let logging = section("logging");
        if let Some(loglevel) = logging.text("loglevel")? {
            self.set_loglevel(&loglevel)?;
        }
        if let Some(log_to_file) = logging.boolean("log_to_file")? {
            self.set_log_to_file(log_to_file);
        }
        Ok(())
    }

    pub fn parse_settings_from_str(&mut self, input: &str) -> Result<(), ConfigError> {
        let document = parse_document_as(input, Some(task_template())).map_err(ConfigError::Task)?;
        self.set_params_from_hashmap(document)?;
        info!(
            "task loaded: {} formula(s), {} points",
            self.formulas.len(),
            self.domain.len()
        );
        Ok(())
    }

    pub fn parse_file(&mut self, path: &str) -> Result<(), ConfigError> {
        let input = fs::read_to_string(path)?;
        self.parse_settings_from_str(&input)
    }

    /// a fresh grapher configured by the task document
    pub fn from_task(input: &str) -> Result<Grapher, ConfigError> {
        let mut grapher = Grapher::new();
        grapher.parse_settings_from_str(input)?;
        Ok(grapher)
    }
}

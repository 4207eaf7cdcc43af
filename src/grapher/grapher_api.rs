//! # Grapher
//!
//! Evaluates a batch of formulas over one shared domain. Each formula runs through its
//! own pipeline, so a formula that fails (bad syntax, a forbidden call, a division by
//! zero) is reported next to the others instead of stopping the batch. Results come
//! back in the order the formulas were given, whether the batch ran sequentially or on
//! the rayon thread pool.
//!
//! # Example
//! ```
//! use RustedGrapher::grapher::grapher_api::Grapher;
//! let mut grapher = Grapher::new();
//! grapher.set_formulas(vec!["sinx", "x^2", "sqrt(x)"]);
//! grapher.set_domain(-1.0, 1.0, 0.5).unwrap();
//! grapher.set_loglevel("off").unwrap();
//! let output = grapher.solve().unwrap();
//! assert_eq!(output.get("x^2").unwrap().values().unwrap().to_vec(), vec![1.0, 0.25, 0.0, 0.25, 1.0]);
//! // sqrt of a negative number is an evaluation failure, the other curves are unaffected
//! assert_eq!(output.failures().len(), 1);
//! ```
use crate::Utils::logger::{save_curves_to_csv, save_curves_to_file};
use crate::Utils::summary::summary_table;
use crate::grapher::domain::Domain;
use crate::grapher::grapher_error::{ConfigError, FormulaFailure, GrapherError};
use crate::grapher::pipeline::{
    GrapherSettings, check_max_formula_length, check_root_precision, check_variable,
    compile_formula,
};
use crate::symbolic::normalizer::BroadcastStrategy;
use crate::symbolic::value::NumericPolicy;
use chrono::Local;
use log::{debug, info, warn};
use ndarray::Array1;
use rayon::prelude::*;
use simplelog::*;
use std::fs::File;
use std::io;
use std::time::Instant;

/// output sequence of one formula, or the reason there is none
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub formula: String,
    pub outcome: Result<Array1<f64>, GrapherError>,
}

impl Curve {
    pub fn values(&self) -> Option<&Array1<f64>> {
        self.outcome.as_ref().ok()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn failure(&self) -> Option<FormulaFailure> {
        match &self.outcome {
            Ok(_) => None,
            Err(error) => Some(FormulaFailure {
                formula: self.formula.clone(),
                error: error.clone(),
            }),
        }
    }
}

/// Result of a batch: the domain and one curve per input formula, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct GraphOutput {
    pub variable: String,
    pub domain: Array1<f64>,
    pub curves: Vec<Curve>,
}

impl GraphOutput {
    /// curve of `formula`; the first one if the same formula was given twice
    pub fn get(&self, formula: &str) -> Option<&Curve> {
        self.curves.iter().find(|curve| curve.formula == formula)
    }

    /// formulas that produced a sequence, with their values
    pub fn successes(&self) -> impl Iterator<Item = (&str, &Array1<f64>)> + '_ {
        self.curves
            .iter()
            .filter_map(|curve| curve.values().map(|values| (curve.formula.as_str(), values)))
    }

    pub fn failures(&self) -> Vec<FormulaFailure> {
        self.curves.iter().filter_map(Curve::failure).collect()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// batch of formulas + domain + settings; call `solve()` and read `get_result()`
#[derive(Debug, Clone)]
pub struct Grapher {
    pub formulas: Vec<String>,
    pub domain: Domain,
    pub settings: GrapherSettings,
    /// evaluate formulas on the rayon thread pool
    pub parallel: bool,
    pub loglevel: LevelFilter,
    /// also write the log to log_<date_time>.txt
    pub log_to_file: bool,
    pub result: Option<GraphOutput>,
}

impl Default for Grapher {
    fn default() -> Self {
        Grapher::new()
    }
}

impl Grapher {
    /// no formulas, domain [-50, 50] with step 0.01, variable x
    pub fn new() -> Grapher {
        Grapher {
            formulas: Vec::new(),
            domain: Domain::default(),
            settings: GrapherSettings::default(),
            parallel: false,
            loglevel: LevelFilter::Info,
            log_to_file: false,
            result: None,
        }
    }

    pub fn set_formulas(&mut self, formulas: Vec<&str>) {
        self.formulas = formulas.into_iter().map(String::from).collect();
    }

    pub fn add_formula(&mut self, formula: &str) {
        self.formulas.push(formula.to_string());
    }

    pub fn set_domain(&mut self, lower: f64, upper: f64, step: f64) -> Result<(), ConfigError> {
        self.domain = Domain::new(lower, upper, step)?;
        Ok(())
    }

    pub fn set_linspace(&mut self, lower: f64, upper: f64, n: usize) -> Result<(), ConfigError> {
        self.domain = Domain::linspace(lower, upper, n)?;
        Ok(())
    }

    pub fn set_variable(&mut self, variable: &str) -> Result<(), ConfigError> {
        check_variable(variable)?;
        self.settings.normalizer.variable = variable.to_string();
        Ok(())
    }

    pub fn set_broadcast(&mut self, broadcast: BroadcastStrategy) {
        self.settings.normalizer.broadcast = broadcast;
    }

    pub fn set_policy(&mut self, policy: NumericPolicy) {
        self.settings.evaluation.policy = policy;
    }

    /// at most [`MAX_ROOT_PRECISION`](crate::symbolic::function_library::MAX_ROOT_PRECISION) decimal places, None for full precision
    pub fn set_root_precision(&mut self, decimals: Option<u32>) -> Result<(), ConfigError> {
        check_root_precision(decimals)?;
        self.settings.evaluation.root_precision = decimals;
        Ok(())
    }

    /// 1 to [`MAX_FORMULA_LENGTH_LIMIT`](crate::symbolic::normalizer::MAX_FORMULA_LENGTH_LIMIT) bytes
    pub fn set_max_formula_length(&mut self, limit: usize) -> Result<(), ConfigError> {
        check_max_formula_length(limit)?;
        self.settings.normalizer.max_formula_length = limit;
        Ok(())
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// debug, info, warn, error or off
    pub fn set_loglevel(&mut self, loglevel: &str) -> Result<(), ConfigError> {
        self.loglevel = parse_loglevel(loglevel).ok_or_else(|| ConfigError::InvalidValue {
            section: "logging".to_string(),
            key: "loglevel".to_string(),
            value: loglevel.to_string(),
        })?;
        Ok(())
    }

    pub fn set_log_to_file(&mut self, log_to_file: bool) {
        self.log_to_file = log_to_file;
    }

    /// Evaluates every formula and stores the result. Does not touch the logger.
    /// Settings are checked first, so fields set directly get the same checks as the setters.
    pub fn graph(&mut self) -> Result<&GraphOutput, ConfigError> {
        self.settings.check()?;
        let start = Instant::now();
        info!(
            "graphing {} formula(s) over {} points of {}",
            self.formulas.len(),
            self.domain.len(),
            self.settings.variable()
        );
        let curves: Vec<Curve> = if self.parallel {
            self.formulas
                .par_iter()
                .map(|formula| graph_one(formula, &self.domain, &self.settings))
                .collect()
        } else {
            self.formulas
                .iter()
                .map(|formula| graph_one(formula, &self.domain, &self.settings))
                .collect()
        };
        for curve in &curves {
            match &curve.outcome {
                Ok(values) => debug!("`{}`: {} values", curve.formula, values.len()),
                Err(error) => warn!("formula `{}`: {}", curve.formula, error),
            }
        }
        let output = GraphOutput {
            variable: self.settings.variable().to_string(),
            domain: self.domain.points().clone(),
            curves,
        };
        info!(
            "{} of {} formula(s) evaluated in {:?}",
            output.successes().count(),
            output.len(),
            start.elapsed()
        );
        Ok(self.result.insert(output))
    }

    /// [`Grapher::graph`] with terminal (and optionally file) logging set up first
    pub fn solve(&mut self) -> Result<&GraphOutput, ConfigError> {
        let level = self.loglevel;
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];
        if self.log_to_file {
            let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
            let name = format!("log_{}.txt", date_and_time);
            match File::create(&name) {
                Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
                Err(e) => eprintln!("cannot create log file {}: {}", name, e),
            }
        }
        // a logger installed by an earlier batch stays in charge
        let _ = CombinedLogger::init(loggers);
        let graphed = self.graph()?;
        info!("\n{}", summary_table(graphed));
        Ok(graphed)
    }

    pub fn get_result(&self) -> Option<&GraphOutput> {
        self.result.as_ref()
    }

    /// tab separated, first column is the variable
    pub fn save_to_file(&self, filename: Option<String>) -> io::Result<()> {
        let output = self.result_or_error()?;
        let name = filename.unwrap_or_else(|| "curves.txt".to_string());
        save_curves_to_file(output, &name)
    }

    pub fn save_to_csv(&self, filename: Option<String>) -> io::Result<()> {
        let output = self.result_or_error()?;
        let name = filename.unwrap_or_else(|| "curves.csv".to_string());
        save_curves_to_csv(output, &name)
    }

    fn result_or_error(&self) -> io::Result<&GraphOutput> {
        self.result.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "nothing to save, call solve() first")
        })
    }
}

fn graph_one(formula: &str, domain: &Domain, settings: &GrapherSettings) -> Curve {
    let outcome = compile_formula(formula, settings)
        .and_then(|compiled| compiled.evaluate(domain, settings));
    Curve {
        formula: formula.to_string(),
        outcome,
    }
}

pub fn parse_loglevel(loglevel: &str) -> Option<LevelFilter> {
    match loglevel.to_lowercase().as_str() {
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" | "none" => Some(LevelFilter::Off),
        _ => None,
    }
}

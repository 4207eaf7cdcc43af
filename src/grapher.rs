#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///________________________________________________________________________________________________________________________________
/// # Grapher
/// batch of formulas evaluated over one domain, failures are reported per formula
///# Example
/// ```
/// use RustedGrapher::grapher::grapher_api::Grapher;
/// let mut grapher = Grapher::new();
/// grapher.set_formulas(vec!["sinx", "cos(x)^2", "log(x, 2)", "eval(x)"]);
/// grapher.set_linspace(0.5, 8.0, 16).unwrap();
/// grapher.set_loglevel("off").unwrap();
/// grapher.solve().unwrap();
/// let output = grapher.get_result().unwrap();
/// assert_eq!(output.len(), 4);
/// for failure in output.failures() {
///     println!("{}", failure);
/// }
/// ```
pub mod grapher_api;
///________________________________________________________________________________________________________________________________
/// # Task file
/// the same grapher configured from a task document
///# Example
/// ```
/// use RustedGrapher::grapher::grapher_api::Grapher;
/// let task = r#"
/// formulas
///     f: "x^2", "2*x + 1"
/// domain
///     lower: -1.0 upper: 1.0 step: 0.5
/// logging
///     loglevel: off
/// "#;
/// let mut grapher = Grapher::from_task(task).unwrap();
/// let output = grapher.solve().unwrap();
/// assert_eq!(output.domain.len(), 5);
/// ```
pub mod grapher_task;
/// evenly spaced sample points
pub mod domain;
pub mod grapher_error;
/// one formula through normalize, parse, validate and evaluate
pub mod pipeline;

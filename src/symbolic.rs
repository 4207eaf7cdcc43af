#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// ________________________________________________________________________________________________________________________________
/// # Function library
/// the fixed vocabulary of formulas: constants e, pi and functions
/// sin cos tan cosec sec cot sqrt cbrt ln log factorial, all of them element-wise
///# Example
/// ```
/// use RustedGrapher::symbolic::function_library::FunctionLibrary;
/// let library = FunctionLibrary::global();
/// let names: Vec<&str> = library.allowed_names().iter().collect();
/// println!("allowed names {:?}", names);
/// assert!(library.function("log").is_some());
/// assert!(library.function("eval").is_none());
/// ```
pub mod function_library;
/// scalar-or-array values and element-wise helpers the evaluator is built on
pub mod value;
///________________________________________________________________________________________________________________________________
/// # Syntax tree
/// closed set of nodes: Constant, Name, BinaryOp, Call
pub mod syntax_tree;
///________________________________________________________________________________________________________________________________
/// # Normalizer
/// human notation to canonical text: `^` to `**`, `sinx` to `sin(x)`, optional identity term for constant formulas
///# Example
/// ```
/// use RustedGrapher::symbolic::normalizer::{normalize_formula, NormalizerSettings};
/// let canonical = normalize_formula("cosx^2 + sinx^2", &NormalizerSettings::default()).unwrap();
/// println!("canonical {}", canonical);
/// assert_eq!(canonical, "cos(x)**2 + sin(x)**2");
/// ```
pub mod normalizer;
///________________________________________________________________________________________________________________________________
/// # Parser
/// canonical text into a syntax tree, everything outside the arithmetic grammar is refused with a position
/// ```
/// use RustedGrapher::symbolic::parse_formula::parse_formula;
/// let tree = parse_formula("x - x**3/factorial(3)").unwrap();
/// println!("tree {}", tree);
/// let error = parse_formula("__import__('os')").unwrap_err();
/// println!("{}", error);
/// ```
pub mod parse_formula;
///________________________________________________________________________________________________________________________________
/// # Validator
/// whitelist gate between a syntax tree and the evaluator
pub mod validator;
///________________________________________________________________________________________________________________________________
/// # Evaluator
/// vectorized evaluation of a validated formula over the domain
///# Example
/// ```
/// use ndarray::Array1;
/// use RustedGrapher::symbolic::evaluator::{evaluate, EvalSettings, Environment};
/// use RustedGrapher::symbolic::function_library::FunctionLibrary;
/// use RustedGrapher::symbolic::normalizer::{normalize_formula, NormalizerSettings};
/// use RustedGrapher::symbolic::parse_formula::parse_formula;
/// use RustedGrapher::symbolic::validator::validate_formula;
///   let library = FunctionLibrary::global();
///   let canonical = normalize_formula("2^x", &NormalizerSettings::default()).unwrap();
///   let validated = validate_formula(parse_formula(&canonical).unwrap(), library).unwrap();
///   let domain = Array1::linspace(0.0, 3.0, 4);
///   let env = Environment::new(library, "x", domain.view());
///   let values = evaluate(&validated, &env, &EvalSettings::default()).unwrap();
///   assert_eq!(values.to_vec(), vec![1.0, 2.0, 4.0, 8.0]);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod evaluator;

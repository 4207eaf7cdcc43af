/*
A tool for pretty printing a batch of curves: one row per formula with its status and value range.
*/
use crate::grapher::grapher_api::{Curve, GraphOutput};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, PartialEq, Tabled)]
pub struct CurveSummary {
    formula: String,
    status: String,
    points: usize,
    min: String,
    max: String,
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

fn summarize(curve: &Curve) -> CurveSummary {
    match &curve.outcome {
        Ok(values) => {
            let (min, max) = match finite_range(values.iter().copied()) {
                Some((min, max)) => (format!("{:.6}", min), format!("{:.6}", max)),
                None => ("-".to_string(), "-".to_string()),
            };
            CurveSummary {
                formula: curve.formula.clone(),
                status: "ok".to_string(),
                points: values.len(),
                min,
                max,
            }
        }
        Err(error) => CurveSummary {
            formula: curve.formula.clone(),
            status: error.to_string(),
            points: 0,
            min: "-".to_string(),
            max: "-".to_string(),
        },
    }
}

pub fn curve_summaries(output: &GraphOutput) -> Vec<CurveSummary> {
    output.curves.iter().map(summarize).collect()
}

/// rendered table, ready to print or log
pub fn summary_table(output: &GraphOutput) -> String {
    let rows = curve_summaries(output);
    let mut table = Table::new(&rows);
    table.with(Style::modern_rounded());
    table.to_string()
}

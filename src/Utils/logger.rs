use crate::grapher::grapher_api::GraphOutput;
use csv::Writer;
use ndarray::Array1;
use std::fs::File;
use std::io::{self, Write};

/// header row and value columns: the variable first, then every curve that has values
fn columns(output: &GraphOutput) -> (Vec<String>, Vec<&Array1<f64>>) {
    let mut headers_with_x = vec![output.variable.clone()];
    let mut columns = vec![&output.domain];
    for (formula, values) in output.successes() {
        headers_with_x.push(formula.to_string());
        columns.push(values);
    }
    (headers_with_x, columns)
}

fn row(columns: &[&Array1<f64>], i: usize) -> Vec<String> {
    columns.iter().map(|column| column[i].to_string()).collect()
}

/// tab separated table, one row per sample point; failed formulas are left out
pub fn save_curves_to_file(output: &GraphOutput, filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;
    let (headers_with_x, columns) = columns(output);
    // Write headers
    writeln!(file, "{}", headers_with_x.join("\t"))?;
    for i in 0..output.domain.len() {
        writeln!(file, "{}", row(&columns, i).join("\t"))?;
    }
    Ok(())
}

/// same table as [`save_curves_to_file`] in csv; formulas with commas are quoted
pub fn save_curves_to_csv(output: &GraphOutput, filename: &str) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    let (headers_with_x, columns) = columns(output);
    writer.write_record(&headers_with_x)?;

    // Write data rows
    for i in 0..output.domain.len() {
        writer.write_record(row(&columns, i))?;
    }

    writer.flush()?;
    Ok(())
}

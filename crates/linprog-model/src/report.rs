//! Text and JSON reports of a solved [`Problem`].

use std::hash::Hash;
use std::io::{self, Write};

use linprog_solver::SolutionStatus;
use serde::Serialize;

use crate::error::ReportError;
use crate::family::{IndexLabel, VariableFamily};
use crate::problem::Problem;

const UNDEFINED: &str = "undefined";

/// Writes status, objective value and one `name = value` line per variable.
///
/// The status is printed as its label ("Optimal"), not its numeric
/// [`code`](SolutionStatus::code), and variables are listed in creation
/// order rather than sorted by name. Before [`Problem::solve`] the status
/// reads "Not Solved" and every value is reported as undefined.
pub fn write_summary<W: Write>(problem: &Problem, mut out: W) -> io::Result<()> {
    writeln!(out, "Optimization status: {}", problem.status())?;
    match problem.objective_value() {
        Some(value) => writeln!(out, "Final value of the objective: {}", value)?,
        None => writeln!(out, "Final value of the objective: {}", UNDEFINED)?,
    }
    writeln!(out, "Final values of the variables:")?;
    for var in problem.variables() {
        match problem.value(var) {
            Some(value) => writeln!(out, "{} = {}", var.name(), value)?,
            None => writeln!(out, "{} = {}", var.name(), UNDEFINED)?,
        }
    }
    out.flush()
}

pub fn print_summary(problem: &Problem) -> io::Result<()> {
    write_summary(problem, io::stdout().lock())
}

/// Writes `family` as a grid: a header of column labels, then one labelled
/// row per element of `rows` whose cells are the truncated values of
/// `family[(column, row)]`.
///
/// Nothing is written when a cell cannot be filled.
pub fn write_table<W, C, R>(
    problem: &Problem,
    family: &VariableFamily<(C, R)>,
    rows: &[R],
    columns: &[C],
    mut out: W,
) -> Result<(), ReportError>
where
    W: Write,
    C: IndexLabel + Eq + Hash + Clone,
    R: IndexLabel + Eq + Hash + Clone,
{
    let column_labels: Vec<String> = columns.iter().map(IndexLabel::label).collect();
    let row_labels: Vec<String> = rows.iter().map(IndexLabel::label).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut line = Vec::with_capacity(columns.len());
        for column in columns {
            let key = (column.clone(), row.clone());
            let var = family
                .get(&key)
                .ok_or_else(|| ReportError::KeyNotFound(format!("({})", key.label())))?;
            let value = problem
                .value(var)
                .ok_or_else(|| ReportError::MissingValue(var.name().to_string()))?;
            line.push((value.trunc() as i64).to_string());
        }
        cells.push(line);
    }

    let label_width = row_labels.iter().map(String::len).max().unwrap_or(0);
    let widths: Vec<usize> = column_labels
        .iter()
        .enumerate()
        .map(|(j, label)| {
            cells
                .iter()
                .map(|line| line[j].len())
                .chain(std::iter::once(label.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(out, "{:<label_width$}", "")?;
    for (label, &width) in column_labels.iter().zip(&widths) {
        write!(out, " {:>width$}", label)?;
    }
    writeln!(out)?;

    for (label, line) in row_labels.iter().zip(&cells) {
        write!(out, "{:<label_width$}", label)?;
        for (cell, &width) in line.iter().zip(&widths) {
            write!(out, " {:>width$}", cell)?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

pub fn print_table<C, R>(
    problem: &Problem,
    family: &VariableFamily<(C, R)>,
    rows: &[R],
    columns: &[C],
) -> Result<(), ReportError>
where
    C: IndexLabel + Eq + Hash + Clone,
    R: IndexLabel + Eq + Hash + Clone,
{
    write_table(problem, family, rows, columns, io::stdout().lock())
}

/// Serializable form of the summary report
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub problem: String,
    pub status: SolutionStatus,
    pub status_code: i32,
    pub objective: Option<f64>,
    pub variables: Vec<VariableReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableReport {
    pub name: String,
    pub value: Option<f64>,
}

impl SolveReport {
    pub fn from_problem(problem: &Problem) -> Self {
        Self {
            problem: problem.name().to_string(),
            status: problem.status(),
            status_code: problem.status().code(),
            objective: problem.objective_value(),
            variables: problem
                .variables()
                .iter()
                .map(|var| VariableReport {
                    name: var.name().to_string(),
                    value: problem.value(var),
                })
                .collect(),
        }
    }
}

pub fn write_json<W: Write>(problem: &Problem, mut out: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut out, &SolveReport::from_problem(problem))?;
    writeln!(out)?;
    Ok(())
}

//! Writes an [`LpProblem`] in the CPLEX `.lp` text format read by CBC,
//! GLPK, Gurobi and most other solvers.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use crate::problem::LpProblem;

/// Returns an object whose `Display` implementation outputs valid `.lp` syntax
pub fn display_lp(problem: &LpProblem) -> DisplayedLp<'_> {
    DisplayedLp(problem)
}

pub fn write_lp<W: Write>(problem: &LpProblem, mut writer: W) -> io::Result<()> {
    write!(writer, "{}", display_lp(problem))?;
    writer.flush()
}

pub struct DisplayedLp<'a>(&'a LpProblem);

impl fmt::Display for DisplayedLp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problem = self.0;
        writeln!(f, "\\* {} *\\", problem.name)?;
        writeln!(f, "{}", if problem.objective.minimize { "Minimize" } else { "Maximize" })?;
        write!(f, "OBJ: ")?;
        write_terms(f, problem, &problem.objective.coefficients)?;
        if problem.objective.constant != 0.0 {
            write!(f, " {} {}", sign(problem.objective.constant), problem.objective.constant.abs())?;
        }
        writeln!(f)?;

        writeln!(f, "Subject To")?;
        for c in &problem.constraints {
            write!(f, "{}: ", c.name)?;
            write_terms(f, problem, &c.coefficients)?;
            writeln!(f, " {} {}", c.op.symbol(), c.rhs)?;
        }

        let mut generals = Vec::new();
        let mut binaries = Vec::new();
        writeln!(f, "Bounds")?;
        for var in &problem.variables {
            if var.is_binary() {
                binaries.push(var.name.as_str());
                continue;
            }
            if var.integer {
                generals.push(var.name.as_str());
            }
            match (var.lower.is_finite(), var.upper.is_finite()) {
                (true, true) if var.lower == var.upper => writeln!(f, " {} = {}", var.name, var.lower)?,
                (true, true) => writeln!(f, " {} <= {} <= {}", var.lower, var.name, var.upper)?,
                // the format's default bound is [0, +inf)
                (true, false) if var.lower == 0.0 => {}
                (true, false) => writeln!(f, " {} >= {}", var.name, var.lower)?,
                (false, true) => writeln!(f, " -inf <= {} <= {}", var.name, var.upper)?,
                (false, false) => writeln!(f, " {} free", var.name)?,
            }
        }

        if !generals.is_empty() {
            writeln!(f, "Generals")?;
            for name in generals {
                writeln!(f, " {}", name)?;
            }
        }
        if !binaries.is_empty() {
            writeln!(f, "Binaries")?;
            for name in binaries {
                writeln!(f, " {}", name)?;
            }
        }
        writeln!(f, "End")
    }
}

fn write_terms(f: &mut fmt::Formatter<'_>, problem: &LpProblem, coefficients: &[f64]) -> fmt::Result {
    let mut line = String::new();
    for (var, &c) in problem.variables.iter().zip(coefficients) {
        if c == 0.0 {
            continue;
        }
        if line.is_empty() {
            if c < 0.0 {
                line.push_str("- ");
            }
        } else {
            write!(line, " {} ", sign(c))?;
        }
        write!(line, "{} {}", c.abs(), var.name)?;
    }
    if line.is_empty() {
        // the format needs at least one term on every row
        match problem.variables.first() {
            Some(var) => write!(line, "0 {}", var.name)?,
            None => line.push('0'),
        }
    }
    f.write_str(&line)
}

fn sign(value: f64) -> char {
    if value < 0.0 { '-' } else { '+' }
}

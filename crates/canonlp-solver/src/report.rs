//! Human-readable renderings of the model. Read-only.

use std::fmt;

use crate::canonical::CanonicalProblem;
use crate::dual::DualProblem;
use crate::problem::Sense;
use crate::tableau::Tableau;

/// Write `c1*v1 + c2*v2 + ...`
fn write_terms<'a>(
    f: &mut fmt::Formatter<'_>,
    coefficients: &[f64],
    names: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    for (i, (coef, name)) in coefficients.iter().zip(names).enumerate() {
        if i > 0 {
            write!(f, " + ")?;
        }
        write!(f, "{}*{}", coef, name)?;
    }
    Ok(())
}

fn sense_word(sense: Sense) -> &'static str {
    match sense {
        Sense::Maximize => "Maximize",
        Sense::Minimize => "Minimize",
    }
}

impl fmt::Display for CanonicalProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = || self.variables.iter().map(String::as_str);

        write!(f, "{} Z = ", sense_word(self.sense))?;
        write_terms(f, &self.objective, names())?;
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "Subject to:")?;

        for c in &self.constraints {
            write_terms(f, &c.coefficients, names())?;
            writeln!(f, " = {}", c.rhs)?;
        }

        writeln!(f)?;
        write!(f, "All variables >= 0")
    }
}

impl fmt::Display for DualProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dual = &self.problem;
        let names: Vec<String> = (1..=dual.num_variables()).map(|i| format!("y{}", i)).collect();
        let names = || names.iter().map(String::as_str);

        write!(f, "{} W = ", sense_word(dual.sense()))?;
        write_terms(f, &dual.objective.coefficients, names())?;
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "Subject to:")?;

        for c in &dual.constraints {
            write_terms(f, &c.coefficients, names())?;
            writeln!(f, " {} {}", c.relation.symbol(), c.rhs)?;
        }

        writeln!(f)?;
        let free: Vec<&str> = names()
            .enumerate()
            .filter(|(i, _)| dual.is_free(*i))
            .map(|(_, n)| n)
            .collect();
        if free.is_empty() {
            write!(f, "All variables y >= 0")
        } else {
            write!(f, "All other variables y >= 0, free: {}", free.join(", "))
        }
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            write!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

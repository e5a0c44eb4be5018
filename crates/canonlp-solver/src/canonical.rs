use std::collections::BTreeMap;

use crate::problem::{LpProblem, ProblemError, Relation, Sense};

/// A linear program in standard form: equality constraints, non-negative variables
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalProblem {
    /// Objective coefficients, one per canonical variable
    pub objective: Vec<f64>,
    /// Objective sense, carried over from the original problem
    pub sense: Sense,
    /// Variable names (for reporting only)
    pub variables: Vec<String>,
    /// Canonical column(s) holding each original variable
    pub columns: Vec<VariableColumns>,
    /// Equality constraints
    pub constraints: Vec<CanonicalConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalConstraint {
    /// Coefficients for each canonical variable
    pub coefficients: Vec<f64>,
    /// Right-hand side value (may be negative)
    pub rhs: f64,
    /// Slack or surplus column introduced for this constraint
    pub slack: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableColumns {
    /// Non-negative variable copied through unchanged
    Direct(usize),
    /// Free variable split as `x = positive - negative`
    Split { positive: usize, negative: usize },
}

impl CanonicalProblem {
    /// Convert a general problem into standard form
    ///
    /// Free variables are split into `x+` and `x-`, every inequality receives
    /// one slack (`<=`) or surplus (`>=`) column. No feasibility check happens
    /// here; a negative right-hand side is carried through as is.
    pub fn from_problem(problem: &LpProblem) -> Result<Self, ProblemError> {
        problem.validate()?;

        let mut objective = Vec::new();
        let mut variables = Vec::new();
        let mut columns = Vec::with_capacity(problem.num_variables());

        for (i, &coef) in problem.objective.coefficients.iter().enumerate() {
            if problem.is_free(i) {
                let positive = objective.len();
                objective.push(coef);
                variables.push(format!("x{}+", i + 1));

                let negative = objective.len();
                objective.push(-coef);
                variables.push(format!("x{}-", i + 1));

                columns.push(VariableColumns::Split { positive, negative });
            } else {
                columns.push(VariableColumns::Direct(objective.len()));
                objective.push(coef);
                variables.push(format!("x{}", i + 1));
            }
        }

        let mut constraints = Vec::with_capacity(problem.num_constraints());
        let mut slack_counter = 1;

        for c in &problem.constraints {
            let mut coefficients = vec![0.0; objective.len()];

            // a * x = a * (x+ - x-)
            for (&coef, &column) in c.coefficients.iter().zip(&columns) {
                match column {
                    VariableColumns::Direct(j) => coefficients[j] += coef,
                    VariableColumns::Split { positive, negative } => {
                        coefficients[positive] += coef;
                        coefficients[negative] -= coef;
                    }
                }
            }

            let slack = match c.relation {
                Relation::Eq => None,
                Relation::Le | Relation::Ge => {
                    let column = objective.len();
                    variables.push(format!("s{}", slack_counter));
                    slack_counter += 1;
                    objective.push(0.0);
                    coefficients.push(if c.relation == Relation::Le { 1.0 } else { -1.0 });
                    Some(column)
                }
            };

            constraints.push(CanonicalConstraint {
                coefficients,
                rhs: c.rhs,
                slack,
            });
        }

        // Earlier constraints were built before later slack columns existed
        let width = objective.len();
        for c in &mut constraints {
            c.coefficients.resize(width, 0.0);
        }

        Ok(Self {
            objective,
            sense: problem.sense(),
            variables,
            columns,
            constraints,
        })
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Free-variable index mapped to its `(x+, x-)` column pair
    pub fn split_variables(&self) -> BTreeMap<usize, (usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(i, column)| match *column {
                VariableColumns::Split { positive, negative } => Some((i, (positive, negative))),
                VariableColumns::Direct(_) => None,
            })
            .collect()
    }

    /// Map a canonical solution back onto the original variables
    pub fn recover(&self, values: &[f64]) -> Vec<f64> {
        let value = |j: usize| values.get(j).copied().unwrap_or(0.0);
        self.columns
            .iter()
            .map(|column| match *column {
                VariableColumns::Direct(j) => value(j),
                VariableColumns::Split { positive, negative } => value(positive) - value(negative),
            })
            .collect()
    }
}

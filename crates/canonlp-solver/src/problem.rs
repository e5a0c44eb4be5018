use thiserror::Error;

/// Represents a general linear programming problem
///
/// Constraints may mix `<=`, `>=` and `=` relations and variables may be
/// sign-unrestricted. Every non-free variable is implicitly `>= 0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Objective function
    pub objective: Objective,
    /// Marks each variable as sign-unrestricted
    #[cfg_attr(feature = "serde", serde(default))]
    pub free: Vec<bool>,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to maximize or minimize
    #[cfg_attr(feature = "serde", serde(default))]
    pub sense: Sense,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sense {
    #[default]
    Maximize,
    Minimize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub relation: Relation,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Problem has no variables")]
    NoVariables,
    #[error("Expected {expected} free-variable flags, found {found}")]
    FreeFlagCount { expected: usize, found: usize },
    #[error("Constraint {index} has {found} coefficients, expected {expected}")]
    ConstraintWidth {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Non-finite value in {0}")]
    NonFinite(String),
    #[error("Tableau needs at least one row and one column")]
    EmptyTableau,
    #[error("Tableau row {row} has {found} entries, expected {expected}")]
    RaggedTableau {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl Relation {
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "=",
        }
    }
}

impl LpProblem {
    pub fn new(coefficients: Vec<f64>, sense: Sense) -> Self {
        let n = coefficients.len();
        Self {
            objective: Objective { coefficients, sense },
            free: vec![false; n],
            constraints: Vec::new(),
        }
    }

    pub fn maximize(coefficients: Vec<f64>) -> Self {
        Self::new(coefficients, Sense::Maximize)
    }

    pub fn minimize(coefficients: Vec<f64>) -> Self {
        Self::new(coefficients, Sense::Minimize)
    }

    /// Mark variable `index` as sign-unrestricted
    pub fn with_free(mut self, index: usize) -> Self {
        if self.free.len() <= index {
            self.free.resize(index + 1, false);
        }
        self.free[index] = true;
        self
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            coefficients,
            relation,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.objective.coefficients.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn sense(&self) -> Sense {
        self.objective.sense
    }

    pub fn is_free(&self, index: usize) -> bool {
        self.free.get(index).copied().unwrap_or(false)
    }

    /// Objective value of `values` under this problem's coefficients
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.objective
            .coefficients
            .iter()
            .zip(values)
            .map(|(c, x)| c * x)
            .sum()
    }

    /// Check that all vectors agree on the variable count and hold finite numbers
    pub fn validate(&self) -> Result<(), ProblemError> {
        let n = self.num_variables();
        if n == 0 {
            return Err(ProblemError::NoVariables);
        }
        if self.free.len() != n {
            return Err(ProblemError::FreeFlagCount {
                expected: n,
                found: self.free.len(),
            });
        }
        if self.objective.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ProblemError::NonFinite("objective".to_string()));
        }

        for (index, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(ProblemError::ConstraintWidth {
                    index,
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(ProblemError::NonFinite(format!("constraint {}", index)));
            }
        }

        Ok(())
    }
}

use crate::problem::Sense;
use crate::tableau::Tableau;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The objective grows without limit
    Unbounded,
    /// No assignment satisfies all constraints
    Infeasible,
    /// The pivot limit was reached before a terminal state
    IterationLimit,
}

/// The outcome of running the simplex loop on a single tableau
#[derive(Debug, Clone)]
pub struct SimplexResult {
    pub status: SolutionStatus,
    /// Value of each tableau column (empty unless optimal)
    pub values: Vec<f64>,
    /// Optimal objective value in the tableau's sense (0 unless optimal)
    pub optimal: f64,
    /// Number of pivots performed
    pub iterations: usize,
    /// The tableau as it stood when the loop stopped
    pub tableau: Tableau,
}

/// The result of solving an LP problem
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each original variable
    pub values: Vec<f64>,
    /// Optimal values for each canonical variable
    pub canonical_values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Pivots performed over both phases
    pub iterations: usize,
}

impl SimplexResult {
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn is_unbounded(&self) -> bool {
        self.status == SolutionStatus::Unbounded
    }

    pub fn is_infeasible(&self) -> bool {
        self.status == SolutionStatus::Infeasible
    }
}

impl Solution {
    /// A non-optimal outcome with no meaningful values
    pub fn terminal(status: SolutionStatus, iterations: usize) -> Self {
        Self {
            status,
            values: Vec::new(),
            canonical_values: Vec::new(),
            objective_value: f64::NAN,
            iterations,
        }
    }

    pub fn infeasible(iterations: usize) -> Self {
        Self::terminal(SolutionStatus::Infeasible, iterations)
    }

    pub fn unbounded(sense: Sense, iterations: usize) -> Self {
        Self {
            objective_value: match sense {
                Sense::Maximize => f64::INFINITY,
                Sense::Minimize => f64::NEG_INFINITY,
            },
            ..Self::terminal(SolutionStatus::Unbounded, iterations)
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

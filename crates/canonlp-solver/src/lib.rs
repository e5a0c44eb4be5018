mod canonical;
mod dual;
mod observer;
mod problem;
mod report;
mod simplex;
mod solution;
mod tableau;

pub use canonical::{CanonicalConstraint, CanonicalProblem, VariableColumns};
pub use dual::DualProblem;
pub use observer::{NoopObserver, Phase, SimplexObserver};
pub use problem::{Constraint, LpProblem, Objective, ProblemError, Relation, Sense};
pub use simplex::{DEFAULT_TOLERANCE, Solver};
pub use solution::{SimplexResult, Solution, SolutionStatus};
pub use tableau::Tableau;

use log::{debug, trace};

use crate::canonical::CanonicalProblem;
use crate::dual::DualProblem;
use crate::observer::{NoopObserver, Phase, SimplexObserver};
use crate::problem::{LpProblem, ProblemError, Sense};
use crate::solution::{SimplexResult, Solution, SolutionStatus};
use crate::tableau::Tableau;

/// Tolerance used when none is configured
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Run the simplex loop on a private copy of `tableau`
    ///
    /// No feasibility phase: the tableau's starting point is taken as
    /// feasible, exactly as given.
    pub fn run(&self, tableau: &Tableau) -> SimplexResult {
        self.run_observed(tableau, &mut NoopObserver)
    }

    pub fn run_observed(
        &self,
        tableau: &Tableau,
        observer: &mut dyn SimplexObserver,
    ) -> SimplexResult {
        let mut tableau = tableau.clone();
        let (status, iterations) = self.iterate(&mut tableau, Phase::Optimization, observer);
        debug!("Simplex run finished: {:?} after {} pivots", status, iterations);

        if status != SolutionStatus::Optimal {
            return SimplexResult {
                status,
                values: Vec::new(),
                optimal: 0.0,
                iterations,
                tableau,
            };
        }

        SimplexResult {
            status,
            values: self.basic_values(&tableau),
            optimal: tableau.objective_value(),
            iterations,
            tableau,
        }
    }

    /// Solve a general problem with the two-phase simplex method
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, ProblemError> {
        self.solve_observed(problem, &mut NoopObserver)
    }

    pub fn solve_observed(
        &self,
        problem: &LpProblem,
        observer: &mut dyn SimplexObserver,
    ) -> Result<Solution, ProblemError> {
        let canonical = CanonicalProblem::from_problem(problem)?;
        let n = canonical.num_variables();
        let mut tableau = self.build_feasibility_tableau(&canonical);
        let mut iterations = 0;

        // Phase 1: only needed when some row has no slack to start from
        if tableau.num_variables() > n {
            debug!(
                "Feasibility phase with {} artificial columns",
                tableau.num_variables() - n
            );
            let (status, pivots) = self.iterate(&mut tableau, Phase::Feasibility, observer);
            iterations += pivots;

            match status {
                SolutionStatus::Optimal => {}
                SolutionStatus::IterationLimit => {
                    return Ok(Solution::terminal(SolutionStatus::IterationLimit, iterations));
                }
                // The auxiliary objective is bounded above by zero
                SolutionStatus::Unbounded | SolutionStatus::Infeasible => {
                    return Ok(Solution::infeasible(iterations));
                }
            }

            let residual = tableau.rhs(tableau.num_constraints());
            if residual < -self.tolerance {
                debug!("Artificial variables stuck at {}, problem is infeasible", -residual);
                return Ok(Solution::infeasible(iterations));
            }

            self.drive_out_artificials(&mut tableau, n);
            tableau.restrict_entering(n);
        }

        // Phase 2: optimize the real objective from the feasible basis
        self.install_objective(&mut tableau, &canonical);
        let (status, pivots) = self.iterate(&mut tableau, Phase::Optimization, observer);
        iterations += pivots;
        debug!("Optimization phase finished: {:?} after {} pivots", status, iterations);

        match status {
            SolutionStatus::Optimal => {}
            SolutionStatus::Unbounded => {
                return Ok(Solution::unbounded(problem.sense(), iterations));
            }
            other => return Ok(Solution::terminal(other, iterations)),
        }

        let mut canonical_values = vec![0.0; n];
        for (i, basic) in tableau.basis().iter().enumerate() {
            if let Some(j) = *basic {
                if j < n {
                    canonical_values[j] = tableau.rhs(i);
                }
            }
        }

        let values = canonical.recover(&canonical_values);
        let objective_value = problem.evaluate(&values);

        Ok(Solution {
            status: SolutionStatus::Optimal,
            values,
            canonical_values,
            objective_value,
            iterations,
        })
    }

    /// Build the dual of `primal` and solve it
    pub fn solve_dual(&self, primal: &LpProblem) -> Result<(DualProblem, Solution), ProblemError> {
        let dual = DualProblem::from_primal(primal)?;
        let solution = self.solve(&dual.problem)?;
        Ok((dual, solution))
    }

    /// First objective-row column below `-tolerance`, in index order
    pub fn select_entering(&self, tableau: &Tableau) -> Option<usize> {
        tableau.objective_row()[..tableau.enterable_columns()]
            .iter()
            .position(|&v| v < -self.tolerance)
    }

    /// Minimum-ratio row for `enter`; ties go to the lowest row index
    pub fn select_leaving(&self, tableau: &Tableau, enter: usize) -> Option<usize> {
        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..tableau.num_constraints() {
            let val = tableau.get(i, enter);
            if val > self.tolerance {
                let ratio = tableau.rhs(i) / val;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    /// Read variable values off the tableau by column structure
    ///
    /// A column is basic when exactly one constraint row holds a non-zero
    /// entry, that entry is 1 and the objective row is zero in that column.
    /// Its value is that row's right-hand side; every other column is 0.
    pub fn basic_values(&self, tableau: &Tableau) -> Vec<f64> {
        let m = tableau.num_constraints();
        let n = tableau.num_variables();
        let mut values = vec![0.0; n];
        let mut claimed = vec![false; m];

        for (j, value) in values.iter_mut().enumerate() {
            let mut rows = (0..m).filter(|&i| tableau.get(i, j).abs() > self.tolerance);
            let (Some(row), None) = (rows.next(), rows.next()) else {
                continue;
            };

            let is_unit = (tableau.get(row, j) - 1.0).abs() <= self.tolerance
                && tableau.get(m, j).abs() <= self.tolerance;
            if is_unit && !claimed[row] {
                claimed[row] = true;
                *value = tableau.rhs(row);
            }
        }

        values
    }

    fn iterate(
        &self,
        tableau: &mut Tableau,
        phase: Phase,
        observer: &mut dyn SimplexObserver,
    ) -> (SolutionStatus, usize) {
        let mut pivots = 0;

        loop {
            observer.on_iteration(phase, pivots + 1, tableau);

            let Some(enter) = self.select_entering(tableau) else {
                return (SolutionStatus::Optimal, pivots);
            };
            let Some(leave) = self.select_leaving(tableau, enter) else {
                trace!("{:?}: column {} has no admissible row", phase, enter);
                return (SolutionStatus::Unbounded, pivots);
            };
            if pivots >= self.max_iterations {
                debug!("{:?}: iteration limit of {} reached", phase, self.max_iterations);
                return (SolutionStatus::IterationLimit, pivots);
            }

            trace!(
                "{:?} pivot {}: column {} enters, row {} leaves",
                phase,
                pivots + 1,
                enter,
                leave
            );
            observer.on_pivot(phase, enter, leave);
            tableau.pivot(enter, leave);
            pivots += 1;
        }
    }

    /// Phase 1 tableau: rows flipped to non-negative rhs, slack columns reused
    /// as the starting basis, one artificial column per remaining row
    fn build_feasibility_tableau(&self, canonical: &CanonicalProblem) -> Tableau {
        let n = canonical.num_variables();
        let mut basis = vec![None; canonical.num_constraints()];

        let mut rows: Vec<Vec<f64>> = canonical
            .constraints
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let sign = if c.rhs < 0.0 { -1.0 } else { 1.0 };
                let mut row: Vec<f64> = c.coefficients.iter().map(|a| sign * a).collect();
                row.resize(n, 0.0);

                if let Some(s) = c.slack {
                    if row[s] > 0.0 {
                        basis[i] = Some(s);
                    }
                }

                row.push(sign * c.rhs);
                row
            })
            .collect();

        let missing: Vec<usize> = (0..rows.len()).filter(|&i| basis[i].is_none()).collect();
        let width = n + missing.len();

        for row in &mut rows {
            let rhs = row.pop().unwrap_or(0.0);
            row.resize(width, 0.0);
            row.push(rhs);
        }

        // Maximize -sum(artificials): the row stores -c, then prices out each
        // artificial basic column
        let mut objective = vec![0.0; width + 1];
        for (k, &i) in missing.iter().enumerate() {
            rows[i][n + k] = 1.0;
            basis[i] = Some(n + k);
            objective[n + k] = 1.0;
        }
        for &i in &missing {
            for (v, a) in objective.iter_mut().zip(&rows[i]) {
                *v -= a;
            }
        }

        rows.push(objective);
        Tableau::with_basis(rows, basis, Sense::Maximize)
    }

    /// Pivot artificial columns still basic at zero level onto real columns
    fn drive_out_artificials(&self, tableau: &mut Tableau, n: usize) {
        for i in 0..tableau.num_constraints() {
            let Some(basic) = tableau.basis()[i] else {
                continue;
            };
            if basic < n {
                continue;
            }

            match (0..n).find(|&j| tableau.get(i, j).abs() > self.tolerance) {
                Some(j) => {
                    trace!("Driving artificial column {} out of row {} via column {}", basic, i, j);
                    tableau.pivot(j, i);
                }
                // Every real coefficient vanished: the row is redundant
                None => debug!("Row {} is redundant, artificial column {} stays at zero", i, basic),
            }
        }
    }

    /// Replace the objective row with the real objective priced out against
    /// the current basis
    fn install_objective(&self, tableau: &mut Tableau, canonical: &CanonicalProblem) {
        let mut objective = vec![0.0; tableau.num_variables() + 1];
        for (j, &c) in canonical.objective.iter().enumerate() {
            objective[j] = match canonical.sense {
                Sense::Maximize => -c,
                Sense::Minimize => c,
            };
        }

        for (i, basic) in tableau.basis().iter().enumerate() {
            let Some(b) = *basic else {
                continue;
            };
            let factor = objective[b];
            if factor != 0.0 {
                for (v, a) in objective.iter_mut().zip(tableau.row(i)) {
                    *v -= factor * a;
                }
            }
        }

        tableau.set_objective(objective, canonical.sense);
    }
}

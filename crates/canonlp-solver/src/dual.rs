use crate::problem::{Constraint, LpProblem, Objective, ProblemError, Relation, Sense};

/// The dual of a primal problem, itself expressed as an [`LpProblem`]
///
/// For a primal `max c'x, Ax <= b, x >= 0` the dual is
/// `min b'y, A'y >= c, y >= 0`: the objective comes from the primal
/// right-hand sides, the constraint matrix is the transpose and each dual
/// right-hand side is a primal objective coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct DualProblem {
    /// The dual program, always a minimization
    pub problem: LpProblem,
    /// Whether the primal objective was negated to reach maximization form
    pub negated: bool,
}

impl DualProblem {
    /// Derive the dual from the raw (non-canonical) primal coefficients
    ///
    /// A minimizing primal is first negated into a maximization. Each `>=` row
    /// is negated into a `<=` row, `=` rows yield free dual variables and free
    /// primal variables yield `=` dual constraints. Everything else maps to a
    /// non-negative dual variable and a `>=` dual constraint. A `>=` primal row
    /// is never transposed as is, since that does not yield a valid dual.
    pub fn from_primal(primal: &LpProblem) -> Result<Self, ProblemError> {
        primal.validate()?;

        let negated = primal.sense() == Sense::Minimize;
        let costs: Vec<f64> = primal
            .objective
            .coefficients
            .iter()
            .map(|&c| if negated { -c } else { c })
            .collect();

        // Bring every row to `a'x <= b` or `a'x = b`
        let rows: Vec<(Vec<f64>, f64)> = primal
            .constraints
            .iter()
            .map(|c| match c.relation {
                Relation::Ge => (c.coefficients.iter().map(|a| -a).collect(), -c.rhs),
                Relation::Le | Relation::Eq => (c.coefficients.clone(), c.rhs),
            })
            .collect();

        let objective = Objective {
            coefficients: rows.iter().map(|(_, b)| *b).collect(),
            sense: Sense::Minimize,
        };
        let free = primal
            .constraints
            .iter()
            .map(|c| c.relation == Relation::Eq)
            .collect();

        let constraints = costs
            .iter()
            .enumerate()
            .map(|(j, &c)| Constraint {
                coefficients: rows.iter().map(|(a, _)| a[j]).collect(),
                relation: if primal.is_free(j) { Relation::Eq } else { Relation::Ge },
                rhs: c,
            })
            .collect();

        Ok(Self {
            problem: LpProblem {
                objective,
                free,
                constraints,
            },
            negated,
        })
    }

    /// Convert a dual optimum back into the primal's objective sense
    pub fn primal_objective(&self, dual_value: f64) -> f64 {
        if self.negated { -dual_value } else { dual_value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Solver;

    /// max 3x + 2y, x + y <= 4, x <= 3, y <= 3 (optimum 11 at (3, 1))
    fn production_problem() -> LpProblem {
        let mut problem = LpProblem::maximize(vec![3.0, 2.0]);
        problem.add_constraint(vec![1.0, 1.0], Relation::Le, 4.0);
        problem.add_constraint(vec![1.0, 0.0], Relation::Le, 3.0);
        problem.add_constraint(vec![0.0, 1.0], Relation::Le, 3.0);
        problem
    }

    #[test]
    fn test_dual_of_symmetric_primal_is_transpose() {
        let dual = DualProblem::from_primal(&production_problem()).unwrap();

        assert_eq!(dual.problem.objective.coefficients, vec![4.0, 3.0, 3.0]);
        assert_eq!(dual.problem.sense(), Sense::Minimize);
        assert_eq!(dual.problem.free, vec![false, false, false]);
        assert_eq!(dual.problem.num_constraints(), 2);
        assert_eq!(dual.problem.constraints[0].coefficients, vec![1.0, 1.0, 0.0]);
        assert_eq!(dual.problem.constraints[1].coefficients, vec![1.0, 0.0, 1.0]);
        assert_eq!(dual.problem.constraints[0].rhs, 3.0);
        assert_eq!(dual.problem.constraints[1].rhs, 2.0);
        assert!(dual.problem.constraints.iter().all(|c| c.relation == Relation::Ge));
        assert!(!dual.negated);
    }

    #[test]
    fn test_ge_rows_are_negated_and_eq_rows_become_free() {
        let mut problem = LpProblem::maximize(vec![1.0, 1.0]).with_free(1);
        problem.add_constraint(vec![2.0, 1.0], Relation::Ge, 1.0);
        problem.add_constraint(vec![1.0, -1.0], Relation::Eq, 0.0);

        let dual = DualProblem::from_primal(&problem).unwrap();

        assert_eq!(dual.problem.objective.coefficients, vec![-1.0, 0.0]);
        assert_eq!(dual.problem.free, vec![false, true]);
        assert_eq!(dual.problem.constraints[0].coefficients, vec![-2.0, 1.0]);
        assert_eq!(dual.problem.constraints[1].coefficients, vec![-1.0, -1.0]);
        assert_eq!(dual.problem.constraints[0].relation, Relation::Ge);
        assert_eq!(dual.problem.constraints[1].relation, Relation::Eq);
    }

    #[test]
    fn test_strong_duality_on_symmetric_primal() {
        let primal = production_problem();
        let solver = Solver::new();

        let primal_solution = solver.solve(&primal).unwrap();
        let (dual, dual_solution) = solver.solve_dual(&primal).unwrap();

        assert!(primal_solution.is_optimal());
        assert!(dual_solution.is_optimal(), "dual status {:?}", dual_solution.status);
        let dual_value = dual.primal_objective(dual_solution.objective_value);
        assert!(
            (primal_solution.objective_value - dual_value).abs() < 1e-6,
            "primal {} vs dual {}",
            primal_solution.objective_value,
            dual_value
        );
        assert!((dual_value - 11.0).abs() < 1e-6, "dual = {} (expected 11)", dual_value);
    }

    #[test]
    fn test_strong_duality_with_mixed_relations() {
        // max 2x + 3y, x + y <= 4, x + 3y <= 6, x >= 1 (optimum 9 at (3, 1))
        let mut primal = LpProblem::maximize(vec![2.0, 3.0]);
        primal.add_constraint(vec![1.0, 1.0], Relation::Le, 4.0);
        primal.add_constraint(vec![1.0, 3.0], Relation::Le, 6.0);
        primal.add_constraint(vec![1.0, 0.0], Relation::Ge, 1.0);
        let solver = Solver::new();

        let primal_solution = solver.solve(&primal).unwrap();
        let (dual, dual_solution) = solver.solve_dual(&primal).unwrap();

        assert!(primal_solution.is_optimal());
        assert!(dual_solution.is_optimal());
        assert!((primal_solution.objective_value - 9.0).abs() < 1e-6);
        assert!(
            (dual.primal_objective(dual_solution.objective_value) - 9.0).abs() < 1e-6,
            "dual = {}",
            dual_solution.objective_value
        );
    }

    #[test]
    fn test_minimizing_primal_maps_back() {
        // min 2x + 3y, x + y >= 4, x <= 3, y <= 3 (optimum 9)
        let mut primal = LpProblem::minimize(vec![2.0, 3.0]);
        primal.add_constraint(vec![1.0, 1.0], Relation::Ge, 4.0);
        primal.add_constraint(vec![1.0, 0.0], Relation::Le, 3.0);
        primal.add_constraint(vec![0.0, 1.0], Relation::Le, 3.0);

        let (dual, dual_solution) = Solver::new().solve_dual(&primal).unwrap();

        assert!(dual.negated);
        assert!(dual_solution.is_optimal());
        let value = dual.primal_objective(dual_solution.objective_value);
        assert!((value - 9.0).abs() < 1e-6, "primal value = {} (expected 9)", value);
    }
}

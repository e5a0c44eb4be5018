use crate::canonical::CanonicalProblem;
use crate::problem::{ProblemError, Sense};

/// Simplex tableau of size `(m + 1) x (n + 1)`
///
/// Rows `0..m` are constraints, row `m` is the objective row. Columns `0..n`
/// are variables, column `n` is the right-hand side. The objective row holds
/// the negated reduced costs of the maximized surrogate objective, and its
/// right-hand side holds the surrogate's current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    basis: Vec<Option<usize>>,
    sense: Sense,
    /// Columns at or beyond this index never enter the basis
    enterable: usize,
}

impl Tableau {
    /// Build the initial tableau for a canonical problem
    pub fn from_canonical(problem: &CanonicalProblem) -> Self {
        let m = problem.num_constraints();
        let n = problem.num_variables();
        let mut data = vec![vec![0.0; n + 1]; m + 1];

        for (i, c) in problem.constraints.iter().enumerate() {
            // Shorter coefficient vectors are zero-padded
            for (j, &coef) in c.coefficients.iter().take(n).enumerate() {
                data[i][j] = coef;
            }
            data[i][n] = c.rhs;
        }

        // Simplex maximizes; a minimization maximizes -c instead
        for (j, &coef) in problem.objective.iter().enumerate() {
            data[m][j] = match problem.sense {
                Sense::Maximize => -coef,
                Sense::Minimize => coef,
            };
        }

        Self::with_detected_basis(data, problem.sense)
    }

    /// Build a tableau from raw rows, the last row being the objective row
    pub fn from_rows(rows: Vec<Vec<f64>>, sense: Sense) -> Result<Self, ProblemError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(ProblemError::EmptyTableau);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ProblemError::RaggedTableau {
                row,
                expected: width,
                found: r.len(),
            });
        }
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ProblemError::NonFinite("tableau".to_string()));
        }

        Ok(Self::with_detected_basis(rows, sense))
    }

    pub(crate) fn with_basis(data: Vec<Vec<f64>>, basis: Vec<Option<usize>>, sense: Sense) -> Self {
        let enterable = data[0].len() - 1;
        Self {
            data,
            basis,
            sense,
            enterable,
        }
    }

    fn with_detected_basis(data: Vec<Vec<f64>>, sense: Sense) -> Self {
        let m = data.len() - 1;
        let n = data[0].len() - 1;
        let mut basis = vec![None; m];

        // A starting basis column is an exact unit column in the constraint rows
        for j in 0..n {
            let nonzero: Vec<usize> = (0..m).filter(|&i| data[i][j] != 0.0).collect();
            if let [row] = nonzero[..] {
                if data[row][j] == 1.0 && basis[row].is_none() {
                    basis[row] = Some(j);
                }
            }
        }

        Self::with_basis(data, basis, sense)
    }

    /// Number of constraint rows (`m`)
    pub fn num_constraints(&self) -> usize {
        self.data.len() - 1
    }

    /// Number of variable columns (`n`)
    pub fn num_variables(&self) -> usize {
        self.data[0].len() - 1
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn objective_row(&self) -> &[f64] {
        &self.data[self.num_constraints()]
    }

    /// Right-hand side of row `row`
    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.num_variables()]
    }

    /// Basic column of each constraint row, where known
    pub fn basis(&self) -> &[Option<usize>] {
        &self.basis
    }

    pub fn enterable_columns(&self) -> usize {
        self.enterable
    }

    pub(crate) fn restrict_entering(&mut self, columns: usize) {
        self.enterable = columns.min(self.num_variables());
    }

    pub(crate) fn set_objective(&mut self, row: Vec<f64>, sense: Sense) {
        let m = self.num_constraints();
        self.data[m] = row;
        self.sense = sense;
    }

    /// Objective value in the tableau's own sense
    pub fn objective_value(&self) -> f64 {
        let value = self.rhs(self.num_constraints());
        match self.sense {
            Sense::Maximize => value,
            Sense::Minimize => -value,
        }
    }

    /// One Gauss-Jordan elimination step around `(leave, enter)`
    ///
    /// Divides the leaving row by the pivot and eliminates the entering column
    /// from every other row, objective row and rhs column included. Afterwards
    /// column `enter` is the unit vector with its 1 in row `leave`.
    ///
    /// The pivot entry must be non-zero.
    pub fn pivot(&mut self, enter: usize, leave: usize) {
        debug_assert!(self.data[leave][enter] != 0.0, "pivot on a zero entry");

        let pivot_val = self.data[leave][enter];
        for v in self.data[leave].iter_mut() {
            *v /= pivot_val;
        }

        let pivot_row = self.data[leave].clone();
        for (i, row) in self.data.iter_mut().enumerate() {
            if i == leave {
                continue;
            }
            let factor = row[enter];
            if factor == 0.0 {
                continue;
            }
            for (v, p) in row.iter_mut().zip(&pivot_row) {
                *v -= factor * p;
            }
        }

        self.basis[leave] = Some(enter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::CanonicalConstraint;
    use crate::problem::{LpProblem, Relation};

    fn mixed_problem() -> LpProblem {
        let mut problem = LpProblem::maximize(vec![2.0, 3.0, -1.0, 4.0, 1.0]).with_free(4);
        problem.add_constraint(vec![1.0, 1.0, 1.0, 0.0, 0.0], Relation::Eq, 10.0);
        problem.add_constraint(vec![2.0, 0.0, 0.0, -1.0, 1.0], Relation::Eq, 5.0);
        problem.add_constraint(vec![0.0, 0.0, 1.0, 2.0, -1.0], Relation::Eq, 3.0);
        problem.add_constraint(vec![1.0, -2.0, 1.0, 0.0, 0.0], Relation::Le, 8.0);
        problem.add_constraint(vec![0.0, 0.0, 0.0, 1.0, 1.0], Relation::Ge, 2.0);
        problem
    }

    #[test]
    fn test_mixed_problem_tableau_shape() {
        let canonical = CanonicalProblem::from_problem(&mixed_problem()).unwrap();
        let tableau = Tableau::from_canonical(&canonical);

        assert_eq!(tableau.rows().len(), 6);
        assert!(tableau.rows().iter().all(|r| r.len() == 9));
        assert_eq!(tableau.num_constraints(), 5);
        assert_eq!(tableau.num_variables(), 8);
    }

    #[test]
    fn test_rhs_column_matches_constraints() {
        let canonical = CanonicalProblem::from_problem(&mixed_problem()).unwrap();
        let tableau = Tableau::from_canonical(&canonical);

        for (i, c) in canonical.constraints.iter().enumerate() {
            assert_eq!(tableau.rhs(i), c.rhs);
        }
        assert_eq!(tableau.rhs(5), 0.0);
    }

    #[test]
    fn test_objective_row_is_negated_for_maximize() {
        let canonical = CanonicalProblem::from_problem(&mixed_problem()).unwrap();
        let tableau = Tableau::from_canonical(&canonical);

        assert_eq!(
            tableau.objective_row(),
            &[-2.0, -3.0, 1.0, -4.0, -1.0, 1.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_objective_row_for_minimize() {
        let mut problem = LpProblem::minimize(vec![2.0, 3.0]);
        problem.add_constraint(vec![1.0, 1.0], Relation::Ge, 4.0);
        let canonical = CanonicalProblem::from_problem(&problem).unwrap();

        let tableau = Tableau::from_canonical(&canonical);

        assert_eq!(tableau.objective_row(), &[2.0, 3.0, 0.0, 0.0]);
        assert_eq!(tableau.sense(), Sense::Minimize);
    }

    #[test]
    fn test_short_constraint_is_zero_padded() {
        let canonical = CanonicalProblem {
            objective: vec![1.0, 1.0, 0.0],
            sense: Sense::Maximize,
            variables: vec!["x1".into(), "x2".into(), "s1".into()],
            columns: Vec::new(),
            constraints: vec![
                CanonicalConstraint {
                    coefficients: vec![1.0, 2.0],
                    rhs: 3.0,
                    slack: None,
                },
                CanonicalConstraint {
                    coefficients: vec![1.0, 0.0, 1.0],
                    rhs: 5.0,
                    slack: Some(2),
                },
            ],
        };

        let tableau = Tableau::from_canonical(&canonical);

        assert_eq!(tableau.row(0), &[1.0, 2.0, 0.0, 3.0]);
        assert_eq!(tableau.basis(), &[None, Some(2)]);
    }

    #[test]
    fn test_pivot_makes_unit_column() {
        let mut tableau = Tableau::from_rows(
            vec![
                vec![2.0, 1.0, 1.0, 0.0, 8.0],
                vec![1.0, 3.0, 0.0, 1.0, 9.0],
                vec![-3.0, -2.0, 0.0, 0.0, 0.0],
            ],
            Sense::Maximize,
        )
        .unwrap();

        tableau.pivot(0, 0);

        assert_eq!(tableau.row(0), &[1.0, 0.5, 0.5, 0.0, 4.0]);
        assert_eq!(tableau.row(1), &[0.0, 2.5, -0.5, 1.0, 5.0]);
        assert_eq!(tableau.objective_row(), &[0.0, -0.5, 1.5, 0.0, 12.0]);
        assert_eq!(tableau.basis(), &[Some(0), Some(3)]);
        assert_eq!(tableau.objective_value(), 12.0);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let result = Tableau::from_rows(vec![vec![1.0, 2.0], vec![1.0]], Sense::Maximize);

        assert_eq!(
            result,
            Err(ProblemError::RaggedTableau {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Tableau::from_rows(Vec::new(), Sense::Maximize),
            Err(ProblemError::EmptyTableau)
        );
    }
}

use crate::tableau::Tableau;

/// Which simplex phase produced a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Driving artificial variables out to reach a feasible basis
    Feasibility,
    /// Optimizing the real objective
    Optimization,
}

/// Receives iteration snapshots from the solver
///
/// Attach one with [`crate::Solver::run_observed`] or
/// [`crate::Solver::solve_observed`]. Both hooks default to doing nothing.
pub trait SimplexObserver {
    /// Called at the start of every iteration, before the entering column is chosen
    fn on_iteration(&mut self, _phase: Phase, _iteration: usize, _tableau: &Tableau) {}

    /// Called right before a pivot on `(leave, enter)`
    fn on_pivot(&mut self, _phase: Phase, _enter: usize, _leave: usize) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl SimplexObserver for NoopObserver {}

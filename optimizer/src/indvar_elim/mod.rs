// Induction variable elimination. For each natural loop with a canonical
// induction variable, values of the form `a * iv + b` are replaced by a
// recurrence of their own: a new header phi that starts at `a * start + b`
// and is bumped by `a * step` in the latch. Candidates with the same
// coefficients share one recurrence.

mod impls;
mod solver;

pub use solver::OneLoopSolver;

pub struct IndvarElim;

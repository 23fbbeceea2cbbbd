// Removes instructions whose results are never used. Liveness spreads
// backwards from side-effecting instructions and terminators, so dead phi
// cycles disappear as well.

mod impls;

pub struct RemoveDeadCode;

pub mod dead_code;
pub mod indvar_elim;
pub mod pipeline;
pub mod scev;

use flow::program::Program;
use utils::errors::Result;

pub use dead_code::RemoveDeadCode;
pub use indvar_elim::IndvarElim;
pub use pipeline::Pipeline;

pub trait IvoOptimizer {
	fn new() -> Self;
	fn apply(self, program: &mut Program) -> Result<bool>;
}

use flow::{func::Func, program::Program};
use ir::TempManager;
use log::debug;
use utils::errors::Result;

use super::{IndvarElim, OneLoopSolver};
use crate::{scev::ScevAnalysis, IvoOptimizer};

impl IvoOptimizer for IndvarElim {
	fn new() -> Self {
		Self {}
	}

	fn apply(self, program: &mut Program) -> Result<bool> {
		fn solve_func(func: &Func, temp_mgr: &mut TempManager) -> bool {
			let (mut loops, loop_map) = func.cfg.loop_analysis();
			// inner loops first, so outer loops see the rewritten bodies
			loops.sort_by_key(|v| std::cmp::Reverse(v.borrow().level));
			let mut flag = false;
			for loop_ in loops {
				// the analysis snapshots defs, so rebuild it per loop
				let mut scev = ScevAnalysis::new(func, &loop_map);
				flag |= OneLoopSolver::new(&func.cfg, loop_, &mut scev, temp_mgr)
					.solve();
			}
			if flag {
				debug!("indvar-elim changed function {}", func.name);
			}
			flag
		}

		let Program { funcs, temp_mgr } = program;
		Ok(
			funcs
				.iter()
				.fold(false, |last, func| solve_func(func, temp_mgr) || last),
		)
	}
}

use std::collections::{HashMap, HashSet, VecDeque};

use flow::{cfg::CFG, program::Program};
use ir::{IrInstrTrait, Temp};
use utils::errors::Result;

use super::RemoveDeadCode;
use crate::IvoOptimizer;

impl IvoOptimizer for RemoveDeadCode {
	fn new() -> Self {
		Self {}
	}

	fn apply(self, program: &mut Program) -> Result<bool> {
		fn solve(cfg: &CFG) -> bool {
			// edges from a written temp to the temps it reads
			let mut graph: HashMap<Temp, Vec<Temp>> = HashMap::new();
			let mut worklist = VecDeque::new();
			for bb in cfg.blocks.iter() {
				let bb = bb.borrow();
				for phi in bb.phi_instrs.iter() {
					graph.insert(phi.target.clone(), phi.get_read());
				}
				for instr in bb.instrs.iter() {
					if instr.has_sideeffect() {
						worklist.extend(instr.get_read());
					} else if let Some(target) = instr.get_write() {
						graph.insert(target, instr.get_read());
					}
				}
				if let Some(jump) = &bb.jump_instr {
					worklist.extend(jump.get_read());
				}
			}
			let mut alive: HashSet<Temp> = HashSet::new();
			while let Some(temp) = worklist.pop_front() {
				if alive.insert(temp.clone()) {
					if let Some(reads) = graph.get(&temp) {
						worklist.extend(reads.iter().cloned());
					}
				}
			}
			let mut flag = false;
			for bb in cfg.blocks.iter() {
				let mut bb = bb.borrow_mut();
				let total = bb.phi_instrs.len() + bb.instrs.len();
				bb.phi_instrs.retain(|v| alive.contains(&v.target));
				bb.instrs.retain(|v| {
					v.has_sideeffect()
						|| v.get_write().map_or(false, |t| alive.contains(&t))
				});
				flag |= bb.phi_instrs.len() + bb.instrs.len() != total;
			}
			flag
		}

		Ok(
			program
				.funcs
				.iter()
				.fold(false, |last, func| solve(&func.cfg) || last),
		)
	}
}

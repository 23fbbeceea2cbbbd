use std::collections::{HashMap, HashSet};

use flow::{basicblock::Node, cfg::CFG, loops::LoopPtr};
use ir::{
	ArithInstr, ArithOp, IrInstrTrait, PhiInstr, Temp, TempManager, Value,
	VarType,
};
use log::trace;
use utils::Label;

use crate::scev::{exact_div, Scev, ScevAnalysis};

// Coefficients of an affine candidate relative to the canonical induction
// variable. Two candidates with the same signature share one recurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AffineSig {
	pub scale: i32,
	pub offset: i32,
}

pub struct OneLoopSolver<'a> {
	cfg: &'a CFG,
	loop_: LoopPtr,
	scev: &'a mut ScevAnalysis,
	temp_mgr: &'a mut TempManager,
}

impl<'a> OneLoopSolver<'a> {
	pub fn new(
		cfg: &'a CFG,
		loop_: LoopPtr,
		scev: &'a mut ScevAnalysis,
		temp_mgr: &'a mut TempManager,
	) -> Self {
		Self {
			cfg,
			loop_,
			scev,
			temp_mgr,
		}
	}

	// First plans without mutating anything, then synthesizes recurrences,
	// rewrites uses and erases the replaced instructions. Returns whether
	// the flow graph changed.
	pub fn solve(&mut self) -> bool {
		let header = self.loop_.borrow().header.clone();
		let header_id = header.borrow().id;
		let (preheader, latch) = {
			let loop_ = self.loop_.borrow();
			(loop_.get_loop_preheader(), loop_.get_loop_latch())
		};
		let (Some(preheader), Some(latch)) = (preheader, latch) else {
			trace!("loop at B{}: no unique preheader or latch", header_id);
			return false;
		};
		if latch.borrow().id == header_id {
			trace!("loop at B{}: header is its own latch", header_id);
			return false;
		}
		let Some((iv, iv_start, iv_step)) = self.find_canonical_iv(&header)
		else {
			trace!("loop at B{}: no canonical induction variable", header_id);
			return false;
		};
		trace!(
			"loop at B{}: canonical induction variable {} with step {}",
			header_id,
			iv,
			iv_step
		);

		// results of header phis are recurrences themselves; matching them
		// or their feeders would undo this pass's own work on a rerun
		let feeders: HashSet<Temp> = header
			.borrow()
			.phi_instrs
			.iter()
			.flat_map(|v| v.source.iter().filter_map(|(v, _)| v.unwrap_temp()))
			.collect();

		let plan = self.plan(&header, &iv, &iv_start, iv_step, &feeders);
		if plan.is_empty() {
			return false;
		}
		self.apply(plan, &iv_start, iv_step, &header, &preheader, &latch);
		true
	}

	// The canonical induction variable is the first header phi whose closed
	// form is a recurrence over this loop with a non-zero constant step.
	fn find_canonical_iv(&mut self, header: &Node) -> Option<(Temp, Scev, i32)> {
		let header_id = header.borrow().id;
		let phi_targets: Vec<Temp> = header
			.borrow()
			.phi_instrs
			.iter()
			.map(|v| v.target.clone())
			.collect();
		for target in phi_targets {
			if let Scev::AddRec {
				header,
				start,
				step,
			} = self.scev.scev_of_temp(&target)
			{
				if header == header_id {
					if let Some(step) = step.as_const().filter(|v| *v != 0) {
						return Some((target, *start, step));
					}
				}
			}
		}
		None
	}

	fn plan(
		&mut self,
		header: &Node,
		iv: &Temp,
		iv_start: &Scev,
		iv_step: i32,
		feeders: &HashSet<Temp>,
	) -> Vec<(Temp, AffineSig)> {
		let header_id = header.borrow().id;
		let mut plan = Vec::new();
		let blocks = self.loop_.borrow().blocks.clone();
		for bb in blocks.iter() {
			let instrs: Vec<_> = bb.borrow().instrs.iter().cloned().collect();
			for instr in instrs {
				let Some(target) = instr.get_write() else {
					continue;
				};
				if target == *iv
					|| feeders.contains(&target)
					|| instr.touches_memory()
					|| !target.var_type.is_int()
				{
					continue;
				}
				let expr = self.scev.scev_of_temp(&target);
				if let Some(sig) = match_affine(&expr, header_id, iv_start, iv_step)
				{
					trace!(
						"loop at B{}: {} matches {} * iv + {}",
						header_id,
						target,
						sig.scale,
						sig.offset
					);
					plan.push((target, sig));
				}
			}
		}
		plan
	}

	fn apply(
		&mut self,
		plan: Vec<(Temp, AffineSig)>,
		iv_start: &Scev,
		iv_step: i32,
		header: &Node,
		preheader: &Node,
		latch: &Node,
	) {
		let preheader_label = preheader.borrow().label();
		let latch_label = latch.borrow().label();
		let mut built: HashMap<AffineSig, Temp> = HashMap::new();
		let mut mapper: HashMap<Temp, Value> = HashMap::new();
		for (target, sig) in plan.iter() {
			let phi = built.entry(*sig).or_insert_with(|| {
				build_recurrence(
					self.temp_mgr,
					*sig,
					iv_start,
					iv_step,
					header,
					latch,
					&preheader_label,
					&latch_label,
				)
			});
			mapper.insert(target.clone(), Value::Temp(phi.clone()));
		}
		// replace every use before erasing the originals
		for bb in self.cfg.blocks.iter() {
			let mut bb = bb.borrow_mut();
			for phi in bb.phi_instrs.iter_mut() {
				phi.map_read_temp(&mapper);
			}
			for instr in bb.instrs.iter_mut() {
				instr.map_read_temp(&mapper);
			}
			if let Some(jump) = bb.jump_instr.as_mut() {
				jump.map_read_temp(&mapper);
			}
		}
		let dead: HashSet<Temp> = plan.into_iter().map(|(v, _)| v).collect();
		for bb in self.loop_.borrow().blocks.iter() {
			bb.borrow_mut()
				.instrs
				.retain(|v| v.get_write().map_or(true, |t| !dead.contains(&t)));
		}
	}
}

// Matches a recurrence over the given loop whose step is an exact constant
// multiple of the induction variable's step and whose offset against the
// induction variable's start folds to a constant.
fn match_affine(
	expr: &Scev,
	header: i32,
	iv_start: &Scev,
	iv_step: i32,
) -> Option<AffineSig> {
	let Scev::AddRec {
		header: h,
		start,
		step,
	} = expr
	else {
		return None;
	};
	if *h != header {
		return None;
	}
	let scale = exact_div(step.as_const()?, iv_step)?;
	let offset = start.sub(&Scev::Const(scale).mul(iv_start)).as_const()?;
	Some(AffineSig { scale, offset })
}

#[allow(clippy::too_many_arguments)]
fn build_recurrence(
	temp_mgr: &mut TempManager,
	sig: AffineSig,
	iv_start: &Scev,
	iv_step: i32,
	header: &Node,
	latch: &Node,
	preheader_label: &Label,
	latch_label: &Label,
) -> Temp {
	let base = Scev::Const(sig.scale)
		.mul(iv_start)
		.add(&Scev::Const(sig.offset))
		.as_const()
		.expect("a matched signature implies a constant base");
	let step = sig.scale.wrapping_mul(iv_step);
	let target = temp_mgr.new_temp(VarType::I32);
	let next = temp_mgr.new_temp(VarType::I32);
	header.borrow_mut().push_phi(PhiInstr {
		target: target.clone(),
		var_type: VarType::I32,
		source: vec![
			(Value::Int(base), preheader_label.clone()),
			(Value::Temp(next.clone()), latch_label.clone()),
		],
	});
	// the latch terminator lives apart from instrs, so a plain push lands
	// the increment right before it
	latch.borrow_mut().push(Box::new(ArithInstr {
		target: next,
		op: ArithOp::Add,
		var_type: VarType::I32,
		lhs: Value::Temp(target.clone()),
		rhs: Value::Int(step),
	}));
	target
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_match_affine() {
		let iv_start = Scev::Const(0);
		let expr = Scev::AddRec {
			header: 1,
			start: Box::new(Scev::Const(7)),
			step: Box::new(Scev::Const(3)),
		};
		assert_eq!(
			match_affine(&expr, 1, &iv_start, 1),
			Some(AffineSig {
				scale: 3,
				offset: 7
			})
		);
		// wrong loop
		assert_eq!(match_affine(&expr, 2, &iv_start, 1), None);
		// step not an exact multiple
		assert_eq!(match_affine(&expr, 1, &iv_start, 2), None);
		// non-constant start of the candidate
		assert_eq!(match_affine(&Scev::Unknown, 1, &iv_start, 1), None);
	}

	#[test]
	fn test_match_affine_nonzero_iv_start() {
		// iv = {5,+,2}, candidate = {17,+,4} == 2 * iv + 7
		let iv_start = Scev::Const(5);
		let expr = Scev::AddRec {
			header: 1,
			start: Box::new(Scev::Const(17)),
			step: Box::new(Scev::Const(4)),
		};
		assert_eq!(
			match_affine(&expr, 1, &iv_start, 2),
			Some(AffineSig {
				scale: 2,
				offset: 7
			})
		);
	}
}

use std::collections::{HashMap, HashSet};

use flow::{func::Func, loops::LoopPtr};
use ir::{
	ArithInstr, ArithOp, InstrVariant, IrInstr, IrInstrTrait, PhiInstr, Temp,
	Value,
};

use super::Scev;

// Lazily computes closed forms for temps of one function. The analysis
// works on a snapshot of the definitions, so it must be rebuilt after the
// flow graph is mutated.
pub struct ScevAnalysis {
	def_map: HashMap<Temp, IrInstr>,
	def_block: HashMap<Temp, i32>,
	loop_map: HashMap<i32, LoopPtr>,
	cache: HashMap<Temp, Scev>,
	in_progress: HashSet<Temp>,
}

impl ScevAnalysis {
	pub fn new(func: &Func, loop_map: &HashMap<i32, LoopPtr>) -> Self {
		let mut def_map = HashMap::new();
		let mut def_block = HashMap::new();
		for bb in func.cfg.blocks.iter() {
			let bb = bb.borrow();
			for phi in bb.phi_instrs.iter() {
				def_map
					.insert(phi.target.clone(), Box::new(phi.clone()) as IrInstr);
				def_block.insert(phi.target.clone(), bb.id);
			}
			for instr in bb.instrs.iter() {
				if let Some(target) = instr.get_write() {
					def_map.insert(target.clone(), instr.clone());
					def_block.insert(target, bb.id);
				}
			}
		}
		Self {
			def_map,
			def_block,
			loop_map: loop_map.clone(),
			cache: HashMap::new(),
			in_progress: HashSet::new(),
		}
	}

	pub fn scev_of_value(&mut self, value: &Value) -> Scev {
		match value {
			Value::Int(v) => Scev::Const(*v),
			Value::Temp(v) => self.scev_of_temp(v),
			_ => Scev::Unknown,
		}
	}

	pub fn scev_of_temp(&mut self, temp: &Temp) -> Scev {
		if let Some(scev) = self.cache.get(temp) {
			return scev.clone();
		}
		if !self.in_progress.insert(temp.clone()) {
			// a def cycle that is not a recognized recurrence
			return Scev::Unknown;
		}
		let scev = self.compute(temp);
		self.in_progress.remove(temp);
		self.cache.insert(temp.clone(), scev.clone());
		scev
	}

	fn compute(&mut self, temp: &Temp) -> Scev {
		// params and globals have no def instruction
		let Some(instr) = self.def_map.get(temp).cloned() else {
			return Scev::Unknown;
		};
		match instr.get_variant() {
			InstrVariant::ArithInstr(arith) => self.compute_arith(arith),
			InstrVariant::PhiInstr(phi) => self.compute_phi(temp, phi),
			_ => Scev::Unknown,
		}
	}

	fn compute_arith(&mut self, instr: &ArithInstr) -> Scev {
		let lhs = self.scev_of_value(&instr.lhs);
		let rhs = self.scev_of_value(&instr.rhs);
		match instr.op {
			ArithOp::Add => lhs.add(&rhs),
			ArithOp::Sub => lhs.sub(&rhs),
			ArithOp::Mul => lhs.mul(&rhs),
			_ => Scev::Unknown,
		}
	}

	// A phi gets a closed form only when it is the header phi of a natural
	// loop with a unique preheader and latch, and its in-loop source is a
	// constant-step update of the phi itself.
	fn compute_phi(&mut self, temp: &Temp, phi: &PhiInstr) -> Scev {
		let Some(&bb_id) = self.def_block.get(temp) else {
			return Scev::Unknown;
		};
		let Some(loop_) = self.loop_map.get(&bb_id).cloned() else {
			return Scev::Unknown;
		};
		let loop_ = loop_.borrow();
		if loop_.header.borrow().id != bb_id {
			return Scev::Unknown;
		}
		let (Some(preheader), Some(latch)) =
			(loop_.get_loop_preheader(), loop_.get_loop_latch())
		else {
			return Scev::Unknown;
		};
		if phi.source.len() != 2 {
			return Scev::Unknown;
		}
		let preheader_label = preheader.borrow().label();
		let latch_label = latch.borrow().label();
		let init = phi.source.iter().find(|(_, l)| *l == preheader_label);
		let update = phi.source.iter().find(|(_, l)| *l == latch_label);
		let (Some((init, _)), Some((update, _))) = (init, update) else {
			return Scev::Unknown;
		};
		let Some(step) = update
			.unwrap_temp()
			.and_then(|v| self.def_map.get(&v).cloned())
			.and_then(|v| phi_step(&phi.target, &v))
		else {
			return Scev::Unknown;
		};
		let init = init.clone();
		let start = self.scev_of_value(&init);
		Scev::AddRec {
			header: bb_id,
			start: Box::new(start),
			step: Box::new(Scev::Const(step)),
		}
	}
}

// Matches `phi + c`, `c + phi` and `phi - c` and returns the signed step.
fn phi_step(phi_target: &Temp, instr: &IrInstr) -> Option<i32> {
	let InstrVariant::ArithInstr(arith) = instr.get_variant() else {
		return None;
	};
	if !arith.var_type.is_int() {
		return None;
	}
	let is_phi = |v: &Value| v.unwrap_temp().is_some_and(|t| t == *phi_target);
	match (arith.op, &arith.lhs, &arith.rhs) {
		(ArithOp::Add, lhs, Value::Int(c)) if is_phi(lhs) => Some(*c),
		(ArithOp::Add, Value::Int(c), rhs) if is_phi(rhs) => Some(*c),
		(ArithOp::Sub, lhs, Value::Int(c)) if is_phi(lhs) => {
			Some(c.wrapping_neg())
		}
		_ => None,
	}
}

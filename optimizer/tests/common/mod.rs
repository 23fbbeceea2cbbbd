// A tiny interpreter for integer flow graphs, used to check that passes
// preserve observable behavior. The trace of a run is the sequence of
// stored values.

use std::collections::HashMap;

use flow::{basicblock::Node, func::Func, parser::parse, program::Program};
use ir::{calc::exec_binaryop, CompOp, InstrVariant, IrInstrTrait, Temp, Value};
use utils::Label;

pub fn parse_program(code: &str) -> Program {
	parse(code).expect("test ir should parse")
}

fn eval(env: &HashMap<Temp, i32>, value: &Value) -> i32 {
	match value {
		Value::Int(v) => *v,
		Value::Temp(v) => *env.get(v).expect("read of an undefined temp"),
		_ => panic!("test interpreter only handles integers"),
	}
}

fn find_block(func: &Func, label: &Label) -> Node {
	func
		.cfg
		.blocks
		.iter()
		.find(|v| v.borrow().label() == *label)
		.expect("jump to a known label")
		.clone()
}

pub fn run_func(func: &Func, max_steps: usize) -> Vec<i32> {
	let mut env: HashMap<Temp, i32> = HashMap::new();
	let mut trace = Vec::new();
	let mut cur = func.cfg.get_entry();
	let mut prev_label: Option<Label> = None;
	for _ in 0..max_steps {
		let block = cur.clone();
		let bb = block.borrow();
		// phis read the environment as it was on block entry
		let snapshot = env.clone();
		for phi in bb.phi_instrs.iter() {
			let (value, _) = phi
				.source
				.iter()
				.find(|(_, l)| Some(l) == prev_label.as_ref())
				.expect("phi has a source for the incoming edge");
			env.insert(phi.target.clone(), eval(&snapshot, value));
		}
		for instr in bb.instrs.iter() {
			match instr.get_variant() {
				InstrVariant::ArithInstr(v) => {
					let lhs = Value::Int(eval(&env, &v.lhs));
					let rhs = Value::Int(eval(&env, &v.rhs));
					let result = exec_binaryop(&lhs, v.op, &rhs)
						.and_then(|v| match v {
							Value::Int(v) => Some(v),
							_ => None,
						})
						.expect("arithmetic folds to an integer");
					env.insert(v.target.clone(), result);
				}
				InstrVariant::CompInstr(v) => {
					let lhs = eval(&env, &v.lhs);
					let rhs = eval(&env, &v.rhs);
					let result = match v.op {
						CompOp::EQ => lhs == rhs,
						CompOp::NE => lhs != rhs,
						CompOp::SLT => lhs < rhs,
						CompOp::SLE => lhs <= rhs,
						CompOp::SGT => lhs > rhs,
						CompOp::SGE => lhs >= rhs,
					};
					env.insert(v.target.clone(), result as i32);
				}
				InstrVariant::StoreInstr(v) => trace.push(eval(&env, &v.value)),
				_ => panic!("unsupported instruction in test interpreter"),
			}
		}
		let jump = bb.jump_instr.clone().expect("block has a terminator");
		let target = match jump.get_variant() {
			InstrVariant::JumpInstr(v) => v.target.clone(),
			InstrVariant::JumpCondInstr(v) => {
				if eval(&env, &v.cond) != 0 {
					v.target_true.clone()
				} else {
					v.target_false.clone()
				}
			}
			InstrVariant::RetInstr(_) => return trace,
			_ => panic!("unsupported terminator in test interpreter"),
		};
		prev_label = Some(bb.label());
		drop(bb);
		cur = find_block(func, &target);
	}
	panic!("test interpreter exceeded its step budget");
}

pub fn run_program(program: &Program) -> Vec<i32> {
	run_func(&program.funcs[0], 10000)
}

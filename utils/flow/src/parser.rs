// line-oriented parser for the textual IR emitted by the Display impls

use std::collections::HashSet;

use ir::*;
use utils::{from_label, IvoError, Label, Result};

use crate::{
	basicblock::BasicBlock, cfg::CFG, func::Func, program::Program, Node,
};

pub fn parse(code: &str) -> Result<Program> {
	let mut program = Program::new();
	let mut max_temp = 0u32;
	let mut cur: Option<FuncBuilder> = None;
	for (idx, raw) in code.lines().enumerate() {
		let line_no = idx + 1;
		let line = raw.trim();
		if line.is_empty() || line.starts_with(';') {
			continue;
		}
		if let Some(rest) = line.strip_prefix("define ") {
			if cur.is_some() {
				return Err(syntax(line_no, "nested function definition"));
			}
			cur = Some(parse_define(rest, line_no)?);
			continue;
		}
		if line == "}" {
			let builder =
				cur.take().ok_or_else(|| syntax(line_no, "unmatched '}'"))?;
			program.funcs.push(builder.finish(line_no)?);
			continue;
		}
		let builder = cur
			.as_mut()
			.ok_or_else(|| syntax(line_no, "instruction outside of a function"))?;
		if let Some(name) = line.strip_suffix(':') {
			builder.start_block(name, line_no)?;
		} else {
			builder.push_instr(line, line_no, &mut max_temp)?;
		}
	}
	if cur.is_some() {
		return Err(syntax(0, "unterminated function definition"));
	}
	program.temp_mgr.total = max_temp;
	Ok(program)
}

fn syntax(line_no: usize, msg: impl std::fmt::Display) -> IvoError {
	IvoError::SyntaxError(format!("line {}: {}", line_no, msg))
}

fn parse_type(tok: &str, line_no: usize) -> Result<VarType> {
	match tok {
		"i32" => Ok(VarType::I32),
		"f32" => Ok(VarType::F32),
		"i32*" => Ok(VarType::I32Ptr),
		"f32*" => Ok(VarType::F32Ptr),
		"void" => Ok(VarType::Void),
		_ => Err(syntax(line_no, format!("unknown type '{}'", tok))),
	}
}

fn parse_arith_op(tok: &str) -> Option<ArithOp> {
	match tok {
		"add" => Some(ArithOp::Add),
		"sub" => Some(ArithOp::Sub),
		"mul" => Some(ArithOp::Mul),
		"div" => Some(ArithOp::Div),
		"rem" => Some(ArithOp::Rem),
		"fadd" => Some(ArithOp::Fadd),
		"fsub" => Some(ArithOp::Fsub),
		"fmul" => Some(ArithOp::Fmul),
		"fdiv" => Some(ArithOp::Fdiv),
		_ => None,
	}
}

fn parse_comp_op(tok: &str, line_no: usize) -> Result<CompOp> {
	match tok {
		"eq" => Ok(CompOp::EQ),
		"ne" => Ok(CompOp::NE),
		"slt" => Ok(CompOp::SLT),
		"sle" => Ok(CompOp::SLE),
		"sgt" => Ok(CompOp::SGT),
		"sge" => Ok(CompOp::SGE),
		_ => Err(syntax(line_no, format!("unknown comparator '{}'", tok))),
	}
}

fn track_temp(name: &str, max_temp: &mut u32) {
	if let Ok(id) = name.parse::<u32>() {
		if id > *max_temp {
			*max_temp = id;
		}
	}
}

fn parse_value(
	tok: &str,
	var_type: VarType,
	line_no: usize,
	max_temp: &mut u32,
) -> Result<Value> {
	let tok = tok.trim().trim_end_matches(',');
	if let Some(name) = tok.strip_prefix('%') {
		track_temp(name, max_temp);
		return Ok(Value::Temp(Temp::new(name, var_type)));
	}
	match var_type {
		VarType::F32 => tok
			.parse::<f32>()
			.map(Value::Float)
			.map_err(|_| syntax(line_no, format!("bad float literal '{}'", tok))),
		_ => tok
			.parse::<i32>()
			.map(Value::Int)
			.map_err(|_| syntax(line_no, format!("bad integer literal '{}'", tok))),
	}
}

struct FuncBuilder {
	name: String,
	ret_type: VarType,
	params: Vec<Value>,
	blocks: Vec<Node>,
	cur_block: Option<Node>,
}

fn parse_define(rest: &str, line_no: usize) -> Result<FuncBuilder> {
	let rest = rest
		.strip_suffix('{')
		.ok_or_else(|| syntax(line_no, "expected '{' after function header"))?
		.trim();
	let (head, params) = rest
		.split_once('(')
		.ok_or_else(|| syntax(line_no, "expected '(' in function header"))?;
	let params = params
		.strip_suffix(')')
		.ok_or_else(|| syntax(line_no, "expected ')' in function header"))?;
	let (ret_type, name) = head
		.trim()
		.split_once(" @")
		.ok_or_else(|| syntax(line_no, "expected '@' in function header"))?;
	let ret_type = parse_type(ret_type.trim(), line_no)?;
	let mut param_values = Vec::new();
	for param in params.split(',') {
		let param = param.trim();
		if param.is_empty() {
			continue;
		}
		let (var_type, temp) = param
			.split_once(' ')
			.ok_or_else(|| syntax(line_no, "expected 'type %name' parameter"))?;
		let var_type = parse_type(var_type, line_no)?;
		let temp = temp
			.trim()
			.strip_prefix('%')
			.ok_or_else(|| syntax(line_no, "expected '%' before parameter name"))?;
		param_values.push(Value::Temp(Temp::new(temp, var_type)));
	}
	Ok(FuncBuilder {
		name: name.trim().to_string(),
		ret_type,
		params: param_values,
		blocks: Vec::new(),
		cur_block: None,
	})
}

impl FuncBuilder {
	fn start_block(&mut self, name: &str, line_no: usize) -> Result<()> {
		let id = from_label(&Label::new(name));
		if id < 0 {
			return Err(syntax(
				line_no,
				format!("bad block label '{}' (expected entry or B<n>)", name),
			));
		}
		if self.blocks.iter().any(|v| v.borrow().id == id) {
			return Err(syntax(line_no, format!("duplicate block label '{}'", name)));
		}
		let node = BasicBlock::new_node(id);
		self.blocks.push(node.clone());
		self.cur_block = Some(node);
		Ok(())
	}

	fn push_instr(
		&mut self,
		line: &str,
		line_no: usize,
		max_temp: &mut u32,
	) -> Result<()> {
		let block = self
			.cur_block
			.clone()
			.ok_or_else(|| syntax(line_no, "instruction outside of a block"))?;
		if block.borrow().jump_instr.is_some() {
			return Err(syntax(line_no, "instruction after block terminator"));
		}
		if let Some(rest) = line.strip_prefix("br label ") {
			block.borrow_mut().set_jump(Some(Box::new(JumpInstr {
				target: Label::new(rest.trim()),
			})));
			return Ok(());
		}
		if let Some(rest) = line.strip_prefix("br ") {
			// br <ty> <cond>, label <A>, label <B>
			let toks: Vec<&str> = rest.split_whitespace().collect();
			if toks.len() != 6 || toks[2] != "label" || toks[4] != "label" {
				return Err(syntax(line_no, "malformed conditional branch"));
			}
			let var_type = parse_type(toks[0], line_no)?;
			let cond = parse_value(toks[1], var_type, line_no, max_temp)?;
			block.borrow_mut().set_jump(Some(Box::new(JumpCondInstr {
				var_type,
				cond,
				target_true: Label::new(toks[3].trim_end_matches(',')),
				target_false: Label::new(toks[5]),
			})));
			return Ok(());
		}
		if line == "ret void" {
			block
				.borrow_mut()
				.set_jump(Some(Box::new(RetInstr { value: Value::Void })));
			return Ok(());
		}
		if let Some(rest) = line.strip_prefix("ret ") {
			let (var_type, value) = rest
				.trim()
				.split_once(' ')
				.ok_or_else(|| syntax(line_no, "malformed return"))?;
			let var_type = parse_type(var_type, line_no)?;
			let value = parse_value(value, var_type, line_no, max_temp)?;
			block
				.borrow_mut()
				.set_jump(Some(Box::new(RetInstr { value })));
			return Ok(());
		}
		if let Some(rest) = line.strip_prefix("store ") {
			// store <ty> <value>, <addr>
			let toks: Vec<&str> = rest.split_whitespace().collect();
			if toks.len() != 3 {
				return Err(syntax(line_no, "malformed store"));
			}
			let var_type = parse_type(toks[0], line_no)?;
			let value = parse_value(toks[1], var_type, line_no, max_temp)?;
			let addr = parse_value(toks[2], type2ptr(var_type), line_no, max_temp)?;
			block.borrow_mut().push(Box::new(StoreInstr { value, addr }));
			return Ok(());
		}
		let (target, rhs) = line
			.split_once(" = ")
			.ok_or_else(|| syntax(line_no, "expected an instruction"))?;
		let target = target
			.trim()
			.strip_prefix('%')
			.ok_or_else(|| syntax(line_no, "expected '%' before target name"))?;
		track_temp(target, max_temp);
		let (op, rest) = rhs
			.trim()
			.split_once(' ')
			.ok_or_else(|| syntax(line_no, "malformed instruction"))?;
		match op {
			"phi" => {
				let (var_type, rest) = rest
					.split_once(' ')
					.ok_or_else(|| syntax(line_no, "malformed phi"))?;
				let var_type = parse_type(var_type, line_no)?;
				let mut source = Vec::new();
				for seg in rest.split(']') {
					let seg = seg.trim().trim_start_matches(',').trim();
					if seg.is_empty() {
						continue;
					}
					let seg = seg
						.strip_prefix('[')
						.ok_or_else(|| syntax(line_no, "malformed phi source"))?;
					let (value, label) = seg
						.split_once(',')
						.ok_or_else(|| syntax(line_no, "malformed phi source"))?;
					let value = parse_value(value, var_type, line_no, max_temp)?;
					source.push((value, Label::new(label.trim())));
				}
				if source.is_empty() {
					return Err(syntax(line_no, "phi without sources"));
				}
				block.borrow_mut().push_phi(PhiInstr {
					target: Temp::new(target, var_type),
					var_type,
					source,
				});
			}
			"icmp" | "fcmp" => {
				let kind = if op == "icmp" {
					CompKind::Icmp
				} else {
					CompKind::Fcmp
				};
				let toks: Vec<&str> = rest.split_whitespace().collect();
				if toks.len() != 4 {
					return Err(syntax(line_no, "malformed comparison"));
				}
				let comp_op = parse_comp_op(toks[0], line_no)?;
				let var_type = parse_type(toks[1], line_no)?;
				let lhs = parse_value(toks[2], var_type, line_no, max_temp)?;
				let rhs = parse_value(toks[3], var_type, line_no, max_temp)?;
				block.borrow_mut().push(Box::new(CompInstr {
					kind,
					target: Temp::new(target, VarType::I32),
					op: comp_op,
					var_type,
					lhs,
					rhs,
				}));
			}
			"load" => {
				// load <ty>, <addr>
				let toks: Vec<&str> = rest.split_whitespace().collect();
				if toks.len() != 2 {
					return Err(syntax(line_no, "malformed load"));
				}
				let var_type = parse_type(toks[0].trim_end_matches(','), line_no)?;
				let addr = parse_value(toks[1], type2ptr(var_type), line_no, max_temp)?;
				block.borrow_mut().push(Box::new(LoadInstr {
					target: Temp::new(target, var_type),
					var_type,
					addr,
				}));
			}
			"getelementptr" => {
				// getelementptr <ptr ty>, <addr>, <offset>
				let toks: Vec<&str> = rest.split_whitespace().collect();
				if toks.len() != 3 {
					return Err(syntax(line_no, "malformed getelementptr"));
				}
				let var_type = parse_type(toks[0].trim_end_matches(','), line_no)?;
				if !var_type.is_ptr() {
					return Err(syntax(line_no, "getelementptr needs a pointer type"));
				}
				let addr = parse_value(toks[1], var_type, line_no, max_temp)?;
				let offset = parse_value(toks[2], VarType::I32, line_no, max_temp)?;
				block.borrow_mut().push(Box::new(GEPInstr {
					target: Temp::new(target, var_type),
					var_type,
					addr,
					offset,
				}));
			}
			"call" => {
				// call <ty> @<func>(<ty> <arg>, ...)
				let (var_type, rest) = rest
					.split_once(' ')
					.ok_or_else(|| syntax(line_no, "malformed call"))?;
				let var_type = parse_type(var_type, line_no)?;
				let rest = rest
					.trim()
					.strip_prefix('@')
					.ok_or_else(|| syntax(line_no, "expected '@' before callee"))?;
				let (func, args) = rest
					.split_once('(')
					.ok_or_else(|| syntax(line_no, "expected '(' in call"))?;
				let args = args
					.strip_suffix(')')
					.ok_or_else(|| syntax(line_no, "expected ')' in call"))?;
				let mut params = Vec::new();
				for arg in args.split(',') {
					let arg = arg.trim();
					if arg.is_empty() {
						continue;
					}
					let (arg_type, value) = arg
						.split_once(' ')
						.ok_or_else(|| syntax(line_no, "expected 'type value' argument"))?;
					let arg_type = parse_type(arg_type, line_no)?;
					let value = parse_value(value, arg_type, line_no, max_temp)?;
					params.push((arg_type, value));
				}
				block.borrow_mut().push(Box::new(CallInstr {
					target: Temp::new(target, var_type),
					var_type,
					func: Label::new(func.trim()),
					params,
				}));
			}
			_ => {
				let arith_op = parse_arith_op(op)
					.ok_or_else(|| syntax(line_no, format!("unknown opcode '{}'", op)))?;
				let toks: Vec<&str> = rest.split_whitespace().collect();
				if toks.len() != 3 {
					return Err(syntax(line_no, "malformed arithmetic"));
				}
				let var_type = parse_type(toks[0], line_no)?;
				let lhs = parse_value(toks[1], var_type, line_no, max_temp)?;
				let rhs = parse_value(toks[2], var_type, line_no, max_temp)?;
				block.borrow_mut().push(Box::new(ArithInstr {
					target: Temp::new(target, var_type),
					op: arith_op,
					var_type,
					lhs,
					rhs,
				}));
			}
		}
		Ok(())
	}

	fn finish(self, line_no: usize) -> Result<Func> {
		if self.blocks.is_empty() {
			return Err(syntax(line_no, "function without blocks"));
		}
		let labels: HashSet<Label> =
			self.blocks.iter().map(|v| v.borrow().label()).collect();
		for block in self.blocks.iter() {
			let block = block.borrow();
			let jump = block
				.jump_instr
				.as_ref()
				.ok_or_else(|| {
					syntax(line_no, format!("block {} lacks a terminator", block.label()))
				})?;
			if let ir::InstrVariant::JumpInstr(jump) = jump.get_variant() {
				if !labels.contains(&jump.target) {
					return Err(syntax(
						line_no,
						format!("jump to unknown label '{}'", jump.target),
					));
				}
			}
			if let ir::InstrVariant::JumpCondInstr(jump) = jump.get_variant() {
				for target in [&jump.target_true, &jump.target_false] {
					if !labels.contains(target) {
						return Err(syntax(
							line_no,
							format!("jump to unknown label '{}'", target),
						));
					}
				}
			}
		}
		let cfg = CFG {
			blocks: self.blocks,
		};
		cfg.resolve_edges();
		Ok(Func {
			cfg,
			name: self.name,
			ret_type: self.ret_type,
			params: self.params,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const LOOP_IR: &str = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%4, B2]
    %2 = icmp slt i32 %1, 100
    br i32 %2, label B2, label B3
  B2:
    %3 = mul i32 %1, 3
    %4 = add i32 %1, 1
    store i32 %3, %p
    br label B1
  B3:
    ret void
}
";

	#[test]
	fn test_round_trip() {
		let program = parse(LOOP_IR).unwrap();
		assert_eq!(program.funcs.len(), 1);
		assert_eq!(program.to_string(), LOOP_IR);
	}

	#[test]
	fn test_edges_resolved() {
		let program = parse(LOOP_IR).unwrap();
		let cfg = &program.funcs[0].cfg;
		let header = cfg.blocks[1].clone();
		assert_eq!(header.borrow().id, 1);
		assert_eq!(header.borrow().prev.len(), 2);
		assert_eq!(header.borrow().succ.len(), 2);
		assert_eq!(program.temp_mgr.total, 4);
	}

	#[test]
	fn test_rejects_missing_terminator() {
		let code = "define void @f() {\n  entry:\n    %1 = add i32 1, 2\n}\n";
		assert!(parse(code).is_err());
	}

	#[test]
	fn test_rejects_unknown_opcode() {
		let code = "define void @f() {\n  entry:\n    %1 = frobnicate i32 1, 2\n    ret void\n}\n";
		assert!(parse(code).is_err());
	}
}

use std::{collections::HashMap, fmt::Display};

use utils::Label;

use crate::{
	ops::{ArithOp, CompKind, CompOp, Value},
	temp::Temp,
	vartype::VarType,
	InstrVariant,
};

pub type IrInstr = Box<dyn IrInstrTrait>;

pub trait IrInstrTrait: Display {
	fn get_read(&self) -> Vec<Temp> {
		Vec::new()
	}
	fn get_write(&self) -> Option<Temp> {
		None
	}
	fn get_variant(&self) -> InstrVariant;
	// true exactly for instructions with a memory read/write effect
	fn touches_memory(&self) -> bool {
		false
	}
	fn has_sideeffect(&self) -> bool {
		false
	}
	// replaces every read of a temp according to the mapping
	fn map_read_temp(&mut self, _map: &HashMap<Temp, Value>) {}
	fn clone_box(&self) -> IrInstr;
}

impl Clone for IrInstr {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

#[derive(Clone)]
pub struct ArithInstr {
	pub target: Temp,
	pub op: ArithOp,
	pub var_type: VarType,
	pub lhs: Value,
	pub rhs: Value,
}

#[derive(Clone)]
pub struct CompInstr {
	pub kind: CompKind,
	pub target: Temp,
	pub op: CompOp,
	pub var_type: VarType,
	pub lhs: Value,
	pub rhs: Value,
}

#[derive(Clone)]
pub struct JumpInstr {
	pub target: Label,
}

#[derive(Clone)]
pub struct JumpCondInstr {
	pub var_type: VarType,
	pub cond: Value,
	pub target_true: Label,
	pub target_false: Label,
}

#[derive(Clone)]
pub struct PhiInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub source: Vec<(Value, Label)>,
}

#[derive(Clone)]
pub struct RetInstr {
	pub value: Value,
}

#[derive(Clone)]
pub struct LoadInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub addr: Value,
}

#[derive(Clone)]
pub struct StoreInstr {
	pub value: Value,
	pub addr: Value,
}

#[derive(Clone)]
pub struct GEPInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub addr: Value,
	pub offset: Value,
}

#[derive(Clone)]
pub struct CallInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub func: Label,
	pub params: Vec<(VarType, Value)>,
}

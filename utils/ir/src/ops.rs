use std::fmt::Display;

use ivo_derive::Mnemonic;

use crate::vartype::VarType;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Int(i32),
	Float(f32),
	Temp(crate::temp::Temp),
	Void,
}

#[derive(Mnemonic, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
	Add,
	Sub,
	Mul,
	Div,
	// modulo
	Rem,
	Fadd,
	Fsub,
	Fmul,
	Fdiv,
}

#[derive(Mnemonic, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompOp {
	EQ,
	NE,
	// signed less than
	SLT,
	// signed less or equal
	SLE,
	// signed greater than
	SGT,
	// signed greater or equal
	SGE,
}

#[derive(Mnemonic, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompKind {
	Icmp,
	Fcmp,
}

impl Value {
	pub fn get_type(&self) -> VarType {
		match self {
			Self::Int(_) => VarType::I32,
			Self::Float(_) => VarType::F32,
			Self::Temp(v) => v.var_type,
			Self::Void => VarType::Void,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Int(v) => write!(f, "{}", v),
			Self::Float(v) => write!(f, "{}", v),
			Self::Temp(v) => write!(f, "{}", v),
			Self::Void => write!(f, "void"),
		}
	}
}

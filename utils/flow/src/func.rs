use ir::{Value, VarType};

use crate::cfg::CFG;

pub struct Func {
	pub cfg: CFG,
	pub name: String,
	pub ret_type: VarType,
	pub params: Vec<Value>,
}

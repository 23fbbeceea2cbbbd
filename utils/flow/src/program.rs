use ir::TempManager;

use crate::func::Func;

pub struct Program {
	pub funcs: Vec<Func>,
	pub temp_mgr: TempManager,
}

impl Program {
	pub fn new() -> Self {
		Self {
			funcs: Vec::new(),
			temp_mgr: TempManager::new(),
		}
	}
}

impl Default for Program {
	fn default() -> Self {
		Self::new()
	}
}

use flow::program::Program;
use log::info;
use utils::{errors::Result, IvoError};

use crate::{dead_code::RemoveDeadCode, indvar_elim::IndvarElim, IvoOptimizer};

pub fn run_pass(name: &str, program: &mut Program) -> Result<bool> {
	match name {
		"indvar-elim" => IndvarElim::new().apply(program),
		"dead-code" => RemoveDeadCode::new().apply(program),
		_ => Err(IvoError::UnknownPass(name.to_string())),
	}
}

fn is_registered(name: &str) -> bool {
	matches!(name, "indvar-elim" | "dead-code")
}

// An ordered list of passes, parsed from a comma-separated string.
// Unknown names are rejected up front, before any pass runs.
pub struct Pipeline {
	passes: Vec<String>,
}

impl Pipeline {
	pub fn parse(list: &str) -> Result<Pipeline> {
		let passes: Vec<String> = list
			.split(',')
			.map(|v| v.trim().to_string())
			.filter(|v| !v.is_empty())
			.collect();
		if let Some(name) = passes.iter().find(|v| !is_registered(v)) {
			return Err(IvoError::UnknownPass(name.clone()));
		}
		Ok(Pipeline { passes })
	}

	pub fn apply(&self, program: &mut Program) -> Result<bool> {
		let mut flag = false;
		for name in self.passes.iter() {
			let changed = run_pass(name, program)?;
			info!("pass {}: changed = {}", name, changed);
			flag |= changed;
		}
		Ok(flag)
	}
}

use std::collections::HashMap;

use ir::InstrVariant;
use utils::Label;

pub use crate::basicblock::{BasicBlock, Node};

pub struct CFG {
	pub blocks: Vec<Node>,
}

impl CFG {
	pub fn get_entry(&self) -> Node {
		self.blocks.first().unwrap().clone()
	}
	// rebuilds prev/succ edges from the terminators
	pub fn resolve_edges(&self) {
		let node_map: HashMap<Label, Node> = self
			.blocks
			.iter()
			.map(|v| (v.borrow().label(), v.clone()))
			.collect();
		for block in self.blocks.iter() {
			block.borrow_mut().prev.clear();
			block.borrow_mut().succ.clear();
		}
		for block in self.blocks.iter() {
			let targets = match block.borrow().jump_instr.as_ref() {
				Some(instr) => match instr.get_variant() {
					InstrVariant::JumpInstr(jump) => vec![jump.target.clone()],
					InstrVariant::JumpCondInstr(jump) => {
						vec![jump.target_true.clone(), jump.target_false.clone()]
					}
					_ => Vec::new(),
				},
				None => Vec::new(),
			};
			for target in targets {
				let to = node_map[&target].clone();
				block.borrow_mut().succ.push(to.clone());
				to.borrow_mut().prev.push(block.clone());
			}
		}
	}
}

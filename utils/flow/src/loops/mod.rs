use std::{cell::RefCell, fmt::Display, rc::Rc};

use crate::basicblock::Node;

pub mod loop_analysis;

pub type LoopPtr = Rc<RefCell<Loop>>;

// Represents one natural loop detected in the flow graph.
pub struct Loop {
	pub outer: Option<LoopPtr>,
	pub header: Node,
	pub level: i32,
	// all blocks of the loop, including those of subloops, in cfg order
	pub blocks: Vec<Node>,
}

impl Loop {
	pub fn new(header: Node) -> Self {
		Self {
			outer: None,
			header,
			level: -1,
			blocks: Vec::new(),
		}
	}

	pub fn contains_block(&self, bb: &Node) -> bool {
		let id = bb.borrow().id;
		self.blocks.iter().any(|v| v.borrow().id == id)
	}

	// the unique predecessor of the header outside the loop; it must have
	// the header as its single successor
	pub fn get_loop_preheader(&self) -> Option<Node> {
		let mut preheader = None;
		for prev in self.header.borrow().prev.iter() {
			if !self.contains_block(prev) {
				if prev.borrow().succ.len() != 1 || preheader.is_some() {
					return None;
				}
				preheader = Some(prev.clone());
			}
		}
		preheader
	}

	// the unique predecessor of the header inside the loop, closing the
	// back-edge
	pub fn get_loop_latch(&self) -> Option<Node> {
		let mut latch = None;
		for prev in self.header.borrow().prev.iter() {
			if self.contains_block(prev) {
				if latch.is_some() {
					return None;
				}
				latch = Some(prev.clone());
			}
		}
		latch
	}
}

impl Display for Loop {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let outer = if let Some(outer) = &self.outer {
			format!("{}", outer.borrow().header.borrow().id)
		} else {
			"None".to_string()
		};
		write!(
			f,
			"outer: {}, header: {}, level: {}",
			outer,
			self.header.borrow().id,
			self.level
		)
	}
}

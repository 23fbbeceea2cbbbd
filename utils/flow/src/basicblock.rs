use std::{cell::RefCell, rc::Rc};

use ir::{IrInstr, PhiInstr};
use utils::{to_label, Label};

pub type Node = Rc<RefCell<BasicBlock>>;

pub struct BasicBlock {
	pub id: i32,
	pub prev: Vec<Node>,
	pub succ: Vec<Node>,
	pub phi_instrs: Vec<PhiInstr>,
	pub instrs: Vec<IrInstr>,
	pub jump_instr: Option<IrInstr>,
}

impl BasicBlock {
	pub fn new(id: i32) -> BasicBlock {
		BasicBlock {
			id,
			prev: Vec::new(),
			succ: Vec::new(),
			phi_instrs: Vec::new(),
			instrs: Vec::new(),
			jump_instr: None,
		}
	}
	pub fn new_node(id: i32) -> Node {
		Rc::new(RefCell::new(Self::new(id)))
	}
	pub fn label(&self) -> Label {
		to_label(self.id)
	}
	pub fn push(&mut self, instr: IrInstr) {
		self.instrs.push(instr);
	}
	pub fn push_phi(&mut self, instr: PhiInstr) {
		self.phi_instrs.push(instr);
	}
	pub fn set_jump(&mut self, instr: Option<IrInstr>) {
		self.jump_instr = instr;
	}
}

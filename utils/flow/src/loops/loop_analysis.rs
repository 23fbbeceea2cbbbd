use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::trace;

use crate::{basicblock::Node, cfg::CFG, dominator::DomTree};

use super::{Loop, LoopPtr};

impl CFG {
	// Detects all natural loops of the graph. Returns the loops and a map
	// from block id to the innermost loop containing that block.
	pub fn loop_analysis(&self) -> (Vec<LoopPtr>, HashMap<i32, LoopPtr>) {
		let dom_tree = DomTree::new(self);
		let mut loop_map = HashMap::new();
		loop_dfs(self.get_entry(), &dom_tree, &mut loop_map);

		let mut loops: Vec<LoopPtr> = Vec::new();
		for loop_ in loop_map.values() {
			if !loops.iter().any(|v| Rc::ptr_eq(v, loop_)) {
				loops.push(loop_.clone());
			}
		}
		for loop_ in loops.iter() {
			calc_loop_level(loop_.clone());
		}
		// a block belongs to its innermost loop and every enclosing one
		for bb in self.blocks.iter() {
			let mut cur = loop_map.get(&bb.borrow().id).cloned();
			while let Some(loop_) = cur {
				loop_.borrow_mut().blocks.push(bb.clone());
				cur = loop_.borrow().outer.clone();
			}
		}
		for loop_ in loops.iter() {
			trace!("found loop: {}", loop_.borrow());
		}
		(loops, loop_map)
	}
}

fn calc_loop_level(loop_: LoopPtr) {
	if loop_.borrow().level != -1 {
		return;
	}
	let outer = loop_.borrow().outer.clone();
	if let Some(outer) = outer {
		calc_loop_level(outer.clone());
		let level = outer.borrow().level + 1;
		loop_.borrow_mut().level = level;
	} else {
		loop_.borrow_mut().level = 1;
	}
}

// dfs on the dominator tree; a predecessor dominated by the current block
// closes a back-edge, and the blocks that reach it form a loop
fn loop_dfs(
	cur_bb: Node,
	dom_tree: &DomTree,
	loop_map: &mut HashMap<i32, LoopPtr>,
) {
	let cur_id = cur_bb.borrow().id;
	for next in dom_tree.get_dom_direct(cur_id) {
		loop_dfs(next, dom_tree, loop_map);
	}
	let mut bbs = Vec::new();
	for prev in cur_bb.borrow().prev.iter() {
		if dom_tree.dominates(cur_id, prev.borrow().id) {
			bbs.push(prev.clone());
		}
	}
	if bbs.is_empty() {
		return;
	}
	let new_loop = Rc::new(RefCell::new(Loop::new(cur_bb.clone())));
	while let Some(bb) = bbs.pop() {
		let bb_id = bb.borrow().id;
		if let Some(inner) = loop_map.get(&bb_id).cloned() {
			// the block is already in a discovered (inner) loop; attach that
			// loop's outermost ancestor under the new loop instead
			let mut outermost = inner;
			loop {
				let outer = outermost.borrow().outer.clone();
				match outer {
					Some(outer) => outermost = outer,
					None => break,
				}
			}
			if Rc::ptr_eq(&outermost, &new_loop) {
				continue;
			}
			outermost.borrow_mut().outer = Some(new_loop.clone());
			let header_prevs = outermost.borrow().header.borrow().prev.clone();
			bbs.extend(header_prevs);
		} else {
			loop_map.insert(bb_id, new_loop.clone());
			if bb_id != cur_id {
				bbs.extend(bb.borrow().prev.iter().cloned());
			}
		}
	}
}

// naive algorithm computing the dominator tree with complexity O(n*m):
// removing a block from the graph makes exactly the blocks it dominates
// unreachable from the entry

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{basicblock::Node, cfg::CFG};

pub struct DomTree {
	pub dominates: HashMap<i32, Vec<Node>>,
	pub dominator: HashMap<i32, Node>,
	pub dom_direct: HashMap<i32, Vec<Node>>,
}

impl DomTree {
	pub fn new(cfg: &CFG) -> Self {
		let mut dominates: HashMap<i32, Vec<Node>> = HashMap::new();
		let mut dominator: HashMap<i32, Node> = HashMap::new();
		let mut dom_direct: HashMap<i32, Vec<Node>> = HashMap::new();

		for bb in cfg.blocks.iter() {
			let to_be_removed = bb.borrow().id;

			let mut reachable = HashSet::new();
			let mut worklist = VecDeque::new();
			if to_be_removed != cfg.get_entry().borrow().id {
				worklist.push_back(cfg.get_entry().clone());
			}
			while let Some(cur) = worklist.pop_front() {
				if reachable.contains(&cur.borrow().id) {
					continue;
				}
				reachable.insert(cur.borrow().id);
				for succ in cur.borrow().succ.iter() {
					if succ.borrow().id != to_be_removed {
						worklist.push_back(succ.clone());
					}
				}
			}
			cfg.blocks.iter().for_each(|bb_inner| {
				if !reachable.contains(&bb_inner.borrow().id) {
					dominates.entry(bb.borrow().id).or_default().push(bb_inner.clone());
				}
			});
		}

		// derive the immediate dominators from the dominates sets
		for bb in cfg.blocks.iter() {
			let bb_id = bb.borrow().id;
			dominates[&bb_id].clone().iter().for_each(|bb_inner| {
				let bb_inner_id = bb_inner.borrow().id;
				if bb_inner_id == bb_id {
					return;
				}
				if dominator.get(&bb_inner_id).is_none() {
					dom_direct.entry(bb_id).or_default().push(bb_inner.clone());
					dominator.insert(bb_inner_id, bb.clone());
				} else if dominates
					[&dominator.get(&bb_inner_id).as_ref().unwrap().borrow().id]
					.iter()
					.any(|v| v.borrow().id == bb_id)
				{
					dom_direct.entry(bb_id).or_default().push(bb_inner.clone());
					dom_direct
						.entry(dominator.get(&bb_inner_id).as_ref().unwrap().borrow().id)
						.or_default()
						.retain(|x| x.borrow().id != bb_inner_id);
					dominator.insert(bb_inner_id, bb.clone());
				}
			});
		}

		Self {
			dominates,
			dominator,
			dom_direct,
		}
	}

	pub fn dominates(&self, id: i32, other: i32) -> bool {
		self
			.dominates
			.get(&id)
			.map_or(false, |v| v.iter().any(|bb| bb.borrow().id == other))
	}
	pub fn get_dom_direct(&self, id: i32) -> Vec<Node> {
		self.dom_direct.get(&id).cloned().unwrap_or_default()
	}
}

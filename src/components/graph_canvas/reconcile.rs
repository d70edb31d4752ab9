use std::collections::HashSet;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::geometry::{SPAWN_BOUND, random_point};
use super::types::{CanvasNode, NodeId, NodeSpec, NodeStore};

/// What a reconciliation changed in the node set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeSetDelta {
	pub added: Vec<NodeId>,
	pub removed: Vec<NodeId>,
	/// Kept nodes whose color or label changed.
	pub restyled: Vec<NodeId>,
}

impl NodeSetDelta {
	pub fn is_empty(&self) -> bool {
		self.added.is_empty() && self.removed.is_empty() && self.restyled.is_empty()
	}

	/// Whether ids entered or left; restyling alone does not count.
	pub fn changes_membership(&self) -> bool {
		!self.added.is_empty() || !self.removed.is_empty()
	}
}

/// Merges incoming node descriptions with the nodes already on the canvas.
pub struct Reconciler {
	rng: StdRng,
	bound: f64,
}

impl Reconciler {
	pub fn new(seed: u64) -> Self {
		Self::with_bound(seed, SPAWN_BOUND)
	}

	pub fn with_bound(seed: u64, bound: f64) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
			bound,
		}
	}

	/// Known ids keep their position and take the new style, unseen ids are
	/// scattered randomly, and ids missing from `incoming` are dropped. The
	/// result follows `incoming` order; a repeated id keeps its first slot.
	pub fn merge(&mut self, previous: &NodeStore, incoming: &[(NodeId, NodeSpec)]) -> (NodeStore, NodeSetDelta) {
		let mut merged = NodeStore::new();
		let mut delta = NodeSetDelta::default();

		for (id, spec) in incoming {
			if merged.contains(id) {
				continue;
			}
			let node = match previous.get(id) {
				Some(prev) => {
					if prev.color != spec.color || prev.label != spec.label {
						delta.restyled.push(id.clone());
					}
					CanvasNode {
						id: id.clone(),
						pos: prev.pos,
						color: spec.color.clone(),
						label: spec.label.clone(),
					}
				}
				None => {
					delta.added.push(id.clone());
					CanvasNode {
						id: id.clone(),
						pos: random_point(&mut self.rng, self.bound),
						color: spec.color.clone(),
						label: spec.label.clone(),
					}
				}
			};
			merged.insert(node);
		}

		let kept: HashSet<&NodeId> = merged.iter().map(|n| &n.id).collect();
		delta.removed = previous
			.iter()
			.filter(|n| !kept.contains(&n.id))
			.map(|n| n.id.clone())
			.collect();

		if !delta.is_empty() {
			debug!(
				"reconciled nodes: +{} -{} ~{}",
				delta.added.len(),
				delta.removed.len(),
				delta.restyled.len()
			);
		}
		(merged, delta)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_canvas::types::Point;

	fn spec(color: &str, label: Option<&str>) -> NodeSpec {
		NodeSpec {
			color: color.into(),
			label: label.map(Into::into),
		}
	}

	fn placed(id: i64, x: f64, y: f64) -> CanvasNode {
		CanvasNode {
			id: id.into(),
			pos: Point::new(x, y),
			color: "red".into(),
			label: None,
		}
	}

	#[test]
	fn new_nodes_spawn_within_bound() {
		let mut reconciler = Reconciler::new(1);
		let incoming: Vec<_> = (0..50).map(|i| (NodeId::Num(i), spec("red", None))).collect();
		let (merged, delta) = reconciler.merge(&NodeStore::new(), &incoming);
		assert_eq!(merged.len(), 50);
		assert_eq!(delta.added.len(), 50);
		for node in merged.iter() {
			assert!(node.pos.x.abs() <= SPAWN_BOUND && node.pos.y.abs() <= SPAWN_BOUND);
		}
	}

	#[test]
	fn existing_nodes_keep_position_and_take_new_style() {
		let mut reconciler = Reconciler::new(2);
		let previous: NodeStore = [placed(1, 12.0, 34.0), placed(2, -5.0, 6.0)].into_iter().collect();
		let incoming = vec![
			(NodeId::Num(1), spec("blue", Some("one"))),
			(NodeId::Num(2), spec("red", None)),
			(NodeId::Num(3), spec("green", None)),
		];
		let (merged, delta) = reconciler.merge(&previous, &incoming);

		let one = merged.get(&NodeId::Num(1)).unwrap();
		assert_eq!(one.pos, Point::new(12.0, 34.0));
		assert_eq!(one.color, "blue");
		assert_eq!(one.label.as_deref(), Some("one"));
		assert_eq!(merged.position(&NodeId::Num(2)), Some(Point::new(-5.0, 6.0)));
		assert_eq!(delta.added, vec![NodeId::Num(3)]);
		assert_eq!(delta.restyled, vec![NodeId::Num(1)]);
		assert!(delta.removed.is_empty());
	}

	#[test]
	fn missing_ids_are_dropped() {
		let mut reconciler = Reconciler::new(3);
		let previous: NodeStore = [placed(1, 0.0, 0.0), placed(2, 1.0, 1.0)].into_iter().collect();
		let (merged, delta) = reconciler.merge(&previous, &[(NodeId::Num(2), spec("red", None))]);
		assert!(!merged.contains(&NodeId::Num(1)));
		assert_eq!(delta.removed, vec![NodeId::Num(1)]);
		assert!(delta.added.is_empty() && delta.restyled.is_empty());
	}

	#[test]
	fn duplicate_ids_keep_first_occurrence() {
		let mut reconciler = Reconciler::new(4);
		let incoming = vec![
			(NodeId::from("x"), spec("red", None)),
			(NodeId::from("x"), spec("blue", None)),
		];
		let (merged, delta) = reconciler.merge(&NodeStore::new(), &incoming);
		assert_eq!(merged.len(), 1);
		assert_eq!(merged.get(&"x".into()).unwrap().color, "red");
		assert_eq!(delta.added.len(), 1);
	}

	#[test]
	fn same_seed_places_identically() {
		let incoming = vec![(NodeId::Num(9), spec("red", None))];
		let (a, _) = Reconciler::new(42).merge(&NodeStore::new(), &incoming);
		let (b, _) = Reconciler::new(42).merge(&NodeStore::new(), &incoming);
		assert_eq!(a, b);
	}
}

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use super::types::{EdgeSpec, NodeId, NodeStore, Vector};

/// Every node reachable from `seed`, ignoring edge direction. Edges to nodes
/// that are not on the canvas are not followed. Empty if `seed` is unknown.
pub fn connected_component(seed: &NodeId, nodes: &NodeStore, edges: &[EdgeSpec]) -> HashSet<NodeId> {
	let mut component = HashSet::new();
	if !nodes.contains(seed) {
		return component;
	}

	let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
	for edge in edges {
		if !(nodes.contains(&edge.from) && nodes.contains(&edge.to)) {
			continue;
		}
		adjacency.entry(&edge.from).or_default().push(&edge.to);
		adjacency.entry(&edge.to).or_default().push(&edge.from);
	}

	let mut queue = VecDeque::from([seed]);
	component.insert(seed.clone());
	while let Some(id) = queue.pop_front() {
		for &next in adjacency.get(id).into_iter().flatten() {
			if component.insert(next.clone()) {
				queue.push_back(next);
			}
		}
	}
	component
}

/// Moves every other member of `moved`'s component by `delta`, assuming
/// `moved` itself has already been placed. Returns the component, or `None`
/// when `delta` is zero and nothing was walked.
pub fn propagate_drag(
	nodes: &mut NodeStore,
	edges: &[EdgeSpec],
	moved: &NodeId,
	delta: Vector,
) -> Option<HashSet<NodeId>> {
	if delta.is_zero() {
		return None;
	}
	let component = connected_component(moved, nodes, edges);
	for node in nodes.iter_mut() {
		if node.id != *moved && component.contains(&node.id) {
			node.pos = node.pos.offset(delta);
		}
	}
	debug!("dragged {moved} carried {} node(s)", component.len().saturating_sub(1));
	Some(component)
}

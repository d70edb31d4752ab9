use std::collections::{HashMap, HashSet, VecDeque};

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::{EdgeSpec, NodeId, NodeStore, Point};

const FORCE_TICKS: usize = 200;
const FORCE_DT: f32 = 0.016;
const TREE_SPACING: f64 = 120.0;

/// How the layout collaborator arranges nodes, from the host's
/// `draw_graph` / `like_tree` flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
	/// Positions stay where reconciliation and dragging put them.
	Free,
	Force,
	Tree,
}

impl LayoutMode {
	pub fn from_flags(draw_graph: bool, like_tree: bool) -> Self {
		match (draw_graph, like_tree) {
			(false, _) => LayoutMode::Free,
			(true, false) => LayoutMode::Force,
			(true, true) => LayoutMode::Tree,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTrigger {
	Description,
	Drag,
}

/// One layout job. `generation` ties the eventual result back to the state
/// that asked for it.
#[derive(Clone, Debug)]
pub struct LayoutRequest {
	pub generation: u64,
	pub mode: LayoutMode,
	pub trigger: LayoutTrigger,
	pub nodes: NodeStore,
	pub edges: Vec<EdgeSpec>,
	/// Nodes the user just placed; layouts must not move them.
	pub pinned: HashSet<NodeId>,
}

#[derive(Clone, Debug)]
pub struct LayoutResult {
	pub generation: u64,
	pub nodes: NodeStore,
}

/// A layout collaborator rewrites node positions in place.
pub trait Layout {
	fn arrange(&self, nodes: &mut NodeStore, edges: &[EdgeSpec], pinned: &HashSet<NodeId>);
}

pub struct FreeLayout;

impl Layout for FreeLayout {
	fn arrange(&self, _: &mut NodeStore, _: &[EdgeSpec], _: &HashSet<NodeId>) {}
}

/// Relaxes the graph for a fixed number of ticks of the force simulation.
pub struct ForceLayout {
	pub ticks: usize,
}

impl Default for ForceLayout {
	fn default() -> Self {
		Self { ticks: FORCE_TICKS }
	}
}

impl Layout for ForceLayout {
	fn arrange(&self, nodes: &mut NodeStore, edges: &[EdgeSpec], pinned: &HashSet<NodeId>) {
		let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let mut id_to_idx = HashMap::new();
		for (i, node) in nodes.iter().enumerate() {
			let idx = graph.add_node(NodeData {
				x: node.pos.x as f32,
				y: node.pos.y as f32,
				mass: 10.0,
				is_anchor: pinned.contains(&node.id),
				user_data: i,
			});
			id_to_idx.insert(node.id.clone(), idx);
		}
		for edge in edges.iter().filter(|e| !e.is_loop()) {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		for _ in 0..self.ticks {
			graph.update(FORCE_DT);
		}

		let mut placed = vec![None; nodes.len()];
		graph.visit_nodes(|node| {
			placed[node.data.user_data] = Some(Point::new(node.x() as f64, node.y() as f64));
		});
		for (node, pos) in nodes.iter_mut().zip(placed) {
			if let Some(pos) = pos.filter(|p| p.x.is_finite() && p.y.is_finite()) {
				node.pos = pos;
			}
		}
	}
}

/// Layered placement: roots (no incoming edge) on top, one row per BFS
/// depth, components side by side.
pub struct TreeLayout {
	pub spacing: f64,
}

impl Default for TreeLayout {
	fn default() -> Self {
		Self {
			spacing: TREE_SPACING,
		}
	}
}

impl TreeLayout {
	fn layers(nodes: &NodeStore, edges: &[EdgeSpec]) -> Vec<Vec<Vec<NodeId>>> {
		let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
		let mut has_parent = HashSet::new();
		for edge in edges {
			if edge.is_loop() || !nodes.contains(&edge.from) || !nodes.contains(&edge.to) {
				continue;
			}
			adjacency.entry(&edge.from).or_default().push(&edge.to);
			adjacency.entry(&edge.to).or_default().push(&edge.from);
			has_parent.insert(&edge.to);
		}

		let roots = nodes
			.iter()
			.map(|n| &n.id)
			.filter(|id| !has_parent.contains(id))
			.chain(nodes.iter().map(|n| &n.id));

		let mut seen: HashSet<&NodeId> = HashSet::new();
		let mut components = Vec::new();
		for root in roots {
			if !seen.insert(root) {
				continue;
			}
			let mut layers: Vec<Vec<NodeId>> = Vec::new();
			let mut queue = VecDeque::from([(root, 0usize)]);
			while let Some((id, depth)) = queue.pop_front() {
				if layers.len() <= depth {
					layers.push(Vec::new());
				}
				layers[depth].push(id.clone());
				for &next in adjacency.get(id).into_iter().flatten() {
					if seen.insert(next) {
						queue.push_back((next, depth + 1));
					}
				}
			}
			components.push(layers);
		}
		components
	}
}

impl Layout for TreeLayout {
	fn arrange(&self, nodes: &mut NodeStore, edges: &[EdgeSpec], _: &HashSet<NodeId>) {
		let components = Self::layers(nodes, edges);
		let mut cursor = 0.0;
		for layers in components {
			let widest = layers.iter().map(Vec::len).max().unwrap_or(0) as f64;
			for (depth, layer) in layers.iter().enumerate() {
				let indent = (widest - layer.len() as f64) * self.spacing / 2.0;
				for (i, id) in layer.iter().enumerate() {
					if let Some(node) = nodes.get_mut(id) {
						node.pos = Point::new(
							cursor + indent + i as f64 * self.spacing,
							depth as f64 * self.spacing,
						);
					}
				}
			}
			cursor += widest * self.spacing;
		}
	}
}

/// Runs the collaborator selected by the request. Tree layouts leave
/// drag-triggered requests alone so the user's placement survives.
pub fn compute_layout(request: LayoutRequest) -> LayoutResult {
	let LayoutRequest {
		generation,
		mode,
		trigger,
		mut nodes,
		edges,
		pinned,
	} = request;

	debug!("layout #{generation}: {mode:?} for {} node(s)", nodes.len());
	match (mode, trigger) {
		(LayoutMode::Free, _) | (LayoutMode::Tree, LayoutTrigger::Drag) => {
			FreeLayout.arrange(&mut nodes, &edges, &pinned)
		}
		(LayoutMode::Force, _) => ForceLayout::default().arrange(&mut nodes, &edges, &pinned),
		(LayoutMode::Tree, LayoutTrigger::Description) => {
			TreeLayout::default().arrange(&mut nodes, &edges, &pinned)
		}
	}
	LayoutResult { generation, nodes }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_canvas::types::{CanvasNode, EdgeAttrs};

	fn store(ids: &[i64]) -> NodeStore {
		ids.iter()
			.map(|&id| CanvasNode {
				id: id.into(),
				pos: Point::new(id as f64 * 3.0, -(id as f64)),
				color: String::new(),
				label: None,
			})
			.collect()
	}

	fn edge(from: i64, to: i64) -> EdgeSpec {
		EdgeSpec::new(from, to, EdgeAttrs::default())
	}

	fn request(mode: LayoutMode, trigger: LayoutTrigger, nodes: NodeStore, edges: Vec<EdgeSpec>) -> LayoutRequest {
		LayoutRequest {
			generation: 7,
			mode,
			trigger,
			nodes,
			edges,
			pinned: HashSet::new(),
		}
	}

	#[test]
	fn mode_follows_flags() {
		assert_eq!(LayoutMode::from_flags(false, true), LayoutMode::Free);
		assert_eq!(LayoutMode::from_flags(true, false), LayoutMode::Force);
		assert_eq!(LayoutMode::from_flags(true, true), LayoutMode::Tree);
	}

	#[test]
	fn free_layout_keeps_positions() {
		let nodes = store(&[1, 2, 3]);
		let result = compute_layout(request(
			LayoutMode::Free,
			LayoutTrigger::Description,
			nodes.clone(),
			vec![edge(1, 2)],
		));
		assert_eq!(result.generation, 7);
		assert_eq!(result.nodes, nodes);
	}

	#[test]
	fn tree_layout_stacks_depths() {
		let nodes = store(&[1, 2, 3, 4]);
		let edges = vec![edge(1, 2), edge(1, 3), edge(4, 4)];
		let result = compute_layout(request(LayoutMode::Tree, LayoutTrigger::Description, nodes, edges));
		let y = |id: i64| result.nodes.position(&id.into()).unwrap().y;
		assert_eq!(y(1), 0.0);
		assert_eq!(y(2), TREE_SPACING);
		assert_eq!(y(3), TREE_SPACING);
		assert_eq!(y(4), 0.0);
		let x = |id: i64| result.nodes.position(&id.into()).unwrap().x;
		assert_eq!(x(1), TREE_SPACING / 2.0);
		assert_eq!(x(4), 2.0 * TREE_SPACING);
	}

	#[test]
	fn tree_layout_ignores_drag_requests() {
		let nodes = store(&[1, 2]);
		let result = compute_layout(request(
			LayoutMode::Tree,
			LayoutTrigger::Drag,
			nodes.clone(),
			vec![edge(1, 2)],
		));
		assert_eq!(result.nodes, nodes);
	}

	#[test]
	fn force_layout_keeps_pinned_nodes() {
		let nodes = store(&[1, 2, 3]);
		let mut req = request(
			LayoutMode::Force,
			LayoutTrigger::Drag,
			nodes.clone(),
			vec![edge(1, 2), edge(2, 3), edge(1, 1)],
		);
		req.pinned.insert(NodeId::Num(2));
		let result = compute_layout(req);
		assert_eq!(result.nodes.len(), 3);
		assert_eq!(result.nodes.position(&NodeId::Num(2)), nodes.position(&NodeId::Num(2)));
		for node in result.nodes.iter() {
			assert!(node.pos.x.is_finite() && node.pos.y.is_finite());
		}
	}
}

use std::collections::HashMap;
use std::fmt;

/// Stable node identity. Numeric ids order numerically, names lexically,
/// and every numeric id sorts before every name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
	Num(i64),
	Name(String),
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeId::Num(n) => write!(f, "{n}"),
			NodeId::Name(s) => f.write_str(s),
		}
	}
}

impl From<i64> for NodeId {
	fn from(n: i64) -> Self {
		NodeId::Num(n)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		NodeId::Name(s.to_string())
	}
}

impl From<String> for NodeId {
	fn from(s: String) -> Self {
		NodeId::Name(s)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn offset(self, delta: Vector) -> Self {
		Self::new(self.x + delta.dx, self.y + delta.dy)
	}

	pub fn delta_to(self, other: Point) -> Vector {
		Vector {
			dx: other.x - self.x,
			dy: other.y - self.y,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
	pub dx: f64,
	pub dy: f64,
}

impl Vector {
	pub fn is_zero(self) -> bool {
		self.dx == 0.0 && self.dy == 0.0
	}
}

/// Presentation attributes of a node as supplied by the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeSpec {
	pub color: String,
	pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeAttrs {
	pub weight: Option<f64>,
	pub color: String,
	pub dashed: bool,
}

/// One declared edge. `from == to` is a self-loop; several edges may share
/// the same unordered pair.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSpec {
	pub from: NodeId,
	pub to: NodeId,
	pub attrs: EdgeAttrs,
}

impl EdgeSpec {
	pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, attrs: EdgeAttrs) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			attrs,
		}
	}

	pub fn is_loop(&self) -> bool {
		self.from == self.to
	}
}

/// Everything the host hands to the canvas on each update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphDescription {
	pub nodes: Vec<(NodeId, NodeSpec)>,
	pub edges: Vec<EdgeSpec>,
	/// Group-drag mode: dragging a node carries its connected component.
	pub drag: bool,
	pub directed: bool,
	pub draw_graph: bool,
	pub like_tree: bool,
}

/// A node as it lives on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasNode {
	pub id: NodeId,
	pub pos: Point,
	pub color: String,
	pub label: Option<String>,
}

/// Canvas nodes in description order with O(1) lookup by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStore {
	nodes: Vec<CanvasNode>,
	index: HashMap<NodeId, usize>,
}

impl NodeStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a node, replacing any node with the same id in place.
	pub fn insert(&mut self, node: CanvasNode) {
		match self.index.get(&node.id) {
			Some(&i) => self.nodes[i] = node,
			None => {
				self.index.insert(node.id.clone(), self.nodes.len());
				self.nodes.push(node);
			}
		}
	}

	pub fn get(&self, id: &NodeId) -> Option<&CanvasNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut CanvasNode> {
		self.index.get(id).map(|&i| &mut self.nodes[i])
	}

	pub fn position(&self, id: &NodeId) -> Option<Point> {
		self.get(id).map(|n| n.pos)
	}

	pub fn contains(&self, id: &NodeId) -> bool {
		self.index.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &CanvasNode> {
		self.nodes.iter()
	}

	/// Ids must not be changed through this; the index would go stale.
	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CanvasNode> {
		self.nodes.iter_mut()
	}

	pub fn as_slice(&self) -> &[CanvasNode] {
		&self.nodes
	}
}

impl FromIterator<CanvasNode> for NodeStore {
	fn from_iter<I: IntoIterator<Item = CanvasNode>>(iter: I) -> Self {
		let mut store = NodeStore::new();
		for node in iter {
			store.insert(node);
		}
		store
	}
}

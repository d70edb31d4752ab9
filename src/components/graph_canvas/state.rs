use std::collections::HashSet;

use log::debug;

use super::bundle::{EdgeShape, bundle_edges};
use super::camera::{Camera, FIT_PADDING, PointerTarget, ViewTransform, Viewport};
use super::error::{CanvasError, Result};
use super::layout::{LayoutMode, LayoutRequest, LayoutResult, LayoutTrigger};
use super::propagate::propagate_drag;
use super::reconcile::Reconciler;
use super::types::{CanvasNode, GraphDescription, NodeId, NodeStore, Point};

pub const NODE_RADIUS: f64 = 12.0;
pub const HIT_RADIUS: f64 = 16.0;

/// Explicit change signals the canvas reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphChange {
	Description(GraphDescription),
	/// The user moved `id` to (`x`, `y`) in canvas coordinates.
	Drag { id: NodeId, x: f64, y: f64 },
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeId>,
	pub start: Point,
	pub node_start: Point,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
	pub viewport: Viewport,
	pub nodes: &'a [CanvasNode],
	pub edges: Vec<EdgeShape>,
	pub directed: bool,
}

/// Single owner of node positions, the current description and the camera.
pub struct CanvasState {
	pub nodes: NodeStore,
	pub description: GraphDescription,
	pub camera: Camera,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
	reconciler: Reconciler,
	generation: u64,
}

impl CanvasState {
	pub fn new(seed: u64, width: f64, height: f64) -> Self {
		Self {
			nodes: NodeStore::new(),
			description: GraphDescription::default(),
			camera: Camera::new(),
			drag: DragState::default(),
			width,
			height,
			reconciler: Reconciler::new(seed),
			generation: 0,
		}
	}

	/// Applies a change and returns the layout job it calls for, if any.
	pub fn apply(&mut self, change: GraphChange) -> Option<LayoutRequest> {
		match change {
			GraphChange::Description(description) => self.set_description(description),
			GraphChange::Drag { id, x, y } => match self.drag_node(&id, Point::new(x, y)) {
				Ok(request) => request,
				Err(err) => {
					debug!("drag ignored: {err}");
					None
				}
			},
		}
	}

	fn set_description(&mut self, description: GraphDescription) -> Option<LayoutRequest> {
		if description == self.description {
			return None;
		}
		let (nodes, delta) = self.reconciler.merge(&self.nodes, &description.nodes);
		let mode_changed = (description.draw_graph, description.like_tree)
			!= (self.description.draw_graph, self.description.like_tree);
		if mode_changed {
			debug!(
				"layout mode is now {:?}",
				LayoutMode::from_flags(description.draw_graph, description.like_tree)
			);
		}
		let relayout = mode_changed
			|| delta.changes_membership()
			|| description.edges != self.description.edges;
		self.nodes = nodes;
		self.description = description;
		// Styling, `directed` and `drag` never move a node.
		relayout.then(|| self.request(LayoutTrigger::Description, HashSet::new()))
	}

	/// Without group drag only the node moves and no layout runs. With it
	/// the node's whole component follows and a layout is requested with
	/// that component pinned. Either way a layout still in flight is made
	/// stale, so it cannot put the node back.
	fn drag_node(&mut self, id: &NodeId, to: Point) -> Result<Option<LayoutRequest>> {
		let node = self
			.nodes
			.get_mut(id)
			.ok_or_else(|| CanvasError::UnknownNode(id.clone()))?;
		let delta = node.pos.delta_to(to);
		node.pos = to;

		if !self.description.drag {
			if !delta.is_zero() {
				self.generation += 1;
			}
			return Ok(None);
		}
		let Some(component) = propagate_drag(&mut self.nodes, &self.description.edges, id, delta)
		else {
			return Ok(None);
		};
		Ok(Some(self.request(LayoutTrigger::Drag, component)))
	}

	fn request(&mut self, trigger: LayoutTrigger, pinned: HashSet<NodeId>) -> LayoutRequest {
		self.generation += 1;
		LayoutRequest {
			generation: self.generation,
			mode: LayoutMode::from_flags(self.description.draw_graph, self.description.like_tree),
			trigger,
			nodes: self.nodes.clone(),
			edges: self.description.edges.clone(),
			pinned,
		}
	}

	/// Materializes a finished layout. Results older than the latest request
	/// are dropped; returns whether the result was applied.
	pub fn complete_layout(&mut self, result: LayoutResult) -> bool {
		if result.generation != self.generation {
			debug!(
				"discarding stale layout #{} (current #{})",
				result.generation, self.generation
			);
			return false;
		}
		self.nodes = result.nodes;
		true
	}

	pub fn frame(&self) -> Frame<'_> {
		Frame {
			viewport: self.camera.viewport,
			nodes: self.nodes.as_slice(),
			edges: bundle_edges(&self.description.edges, &self.nodes),
			directed: self.description.directed,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.camera.viewport.screen_transform(self.width, self.height)
	}

	/// Screen pixels per canvas unit, or `None` while the canvas has no usable
	/// size (zero-sized or not yet measured).
	fn scale(&self) -> Option<f64> {
		let k = self.transform().k;
		(k.is_finite() && k > 0.0).then_some(k)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let p = self.transform().screen_to_graph(sx, sy);
		self.nodes
			.iter()
			.filter(|n| {
				let d = n.pos.delta_to(p);
				(d.dx * d.dx + d.dy * d.dy).sqrt() < HIT_RADIUS
			})
			.last()
			.map(|n| n.id.clone())
	}

	/// Routes a pointer press to a node drag or a background pan.
	pub fn press(&mut self, sx: f64, sy: f64) {
		let Some(k) = self.scale() else {
			return;
		};
		let target = match self.node_at_position(sx, sy) {
			Some(id) => PointerTarget::Node(id),
			None => PointerTarget::Background,
		};
		if let PointerTarget::Node(id) = &target {
			if let Some(node) = self.nodes.get(id) {
				self.drag = DragState {
					active: true,
					node: Some(id.clone()),
					start: Point::new(sx, sy),
					node_start: node.pos,
				};
			}
		}
		self.camera.begin_pan(Point::new(sx / k, sy / k), &target);
	}

	/// Pointer motion: drags the held node or pans the camera.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> Option<LayoutRequest> {
		let k = self.scale()?;
		if self.drag.active {
			let id = self.drag.node.clone()?;
			let to = Point::new(
				self.drag.node_start.x + (sx - self.drag.start.x) / k,
				self.drag.node_start.y + (sy - self.drag.start.y) / k,
			);
			return self.apply(GraphChange::Drag { id, x: to.x, y: to.y });
		}
		if self.camera.is_panning() {
			self.camera.continue_pan(Point::new(sx / k, sy / k));
		}
		None
	}

	pub fn release(&mut self) {
		self.drag = DragState::default();
		self.camera.end_pan();
	}

	/// Wheel zoom keeping the canvas point under the cursor in place.
	/// Falls back to zooming around the center while the canvas has no size.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta: f64) {
		if self.scale().is_none() {
			self.camera.zoom(delta);
			return;
		}
		let p = self.transform().screen_to_graph(sx, sy);
		let vp = self.camera.viewport;
		self.camera
			.zoom_biased(delta, (p.x - vp.x) / vp.width, (p.y - vp.y) / vp.height);
	}

	/// One zoom step around the viewport center, for the zoom buttons.
	pub fn zoom_step(&mut self, delta: f64) {
		self.camera.zoom(delta);
	}

	pub fn reset_view(&mut self) {
		let points: Vec<Point> = self.nodes.iter().map(|n| n.pos).collect();
		self.camera.reset_to_fit(points, FIT_PADDING);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

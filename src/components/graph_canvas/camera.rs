use log::debug;

use super::error::{CanvasError, Result};
use super::types::{NodeId, Point};

pub const DEFAULT_VIEWPORT: Viewport = Viewport {
	x: -500.0,
	y: -500.0,
	width: 2000.0,
	height: 2000.0,
};
pub const ZOOM_FACTOR: f64 = 1.1;
pub const FIT_PADDING: f64 = 100.0;
pub const MIN_EXTENT: f64 = 1.0;
pub const MAX_EXTENT: f64 = 1e7;

/// Visible window in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
		let valid = |v: f64| v.is_finite() && (MIN_EXTENT..=MAX_EXTENT).contains(&v);
		if !(x.is_finite() && y.is_finite() && valid(width) && valid(height)) {
			return Err(CanvasError::DegenerateViewport { width, height });
		}
		Ok(Self {
			x,
			y,
			width,
			height,
		})
	}

	#[cfg(test)]
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// Fits the viewport into a `width`x`height` screen, centered and
	/// aspect-preserving.
	pub fn screen_transform(&self, width: f64, height: f64) -> ViewTransform {
		let k = (width / self.width).min(height / self.height);
		ViewTransform {
			x: (width - self.width * k) / 2.0 - self.x * k,
			y: (height - self.height * k) / 2.0 - self.y * k,
			k,
		}
	}
}

impl Default for Viewport {
	fn default() -> Self {
		DEFAULT_VIEWPORT
	}
}

/// Screen = canvas * k + (x, y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}
}

/// What a pointer press landed on. Edges are not hit-tested, so a press on
/// an edge counts as background.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerTarget {
	Background,
	Node(NodeId),
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub last: Point,
}

#[derive(Clone, Debug, Default)]
pub struct Camera {
	pub viewport: Viewport,
	pub pan: PanState,
}

impl Camera {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts panning, but only from the background so node drags never pan.
	pub fn begin_pan(&mut self, pointer: Point, target: &PointerTarget) {
		if *target != PointerTarget::Background || !pointer.x.is_finite() || !pointer.y.is_finite() {
			return;
		}
		self.pan.active = true;
		self.pan.last = pointer;
	}

	/// Shifts the origin against the pointer motion. Non-finite motion is
	/// dropped so the viewport always stays valid.
	pub fn continue_pan(&mut self, pointer: Point) {
		if !self.pan.active {
			return;
		}
		let delta = self.pan.last.delta_to(pointer);
		if !delta.dx.is_finite() || !delta.dy.is_finite() {
			debug!("pan step dropped: non-finite pointer {pointer:?}");
			return;
		}
		self.viewport.x -= delta.dx;
		self.viewport.y -= delta.dy;
		self.pan.last = pointer;
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	/// Zooms around the viewport center. Negative `delta` zooms in.
	pub fn zoom(&mut self, delta: f64) {
		self.zoom_biased(delta, 0.5, 0.5);
	}

	/// Zooms keeping the point at fraction (`bias_x`, `bias_y`) of the
	/// viewport fixed. Steps that would leave the allowed extent are dropped.
	pub fn zoom_biased(&mut self, delta: f64, bias_x: f64, bias_y: f64) {
		if delta == 0.0 || delta.is_nan() {
			return;
		}
		let vp = self.viewport;
		let (w, h) = if delta < 0.0 {
			(vp.width / ZOOM_FACTOR, vp.height / ZOOM_FACTOR)
		} else {
			(vp.width * ZOOM_FACTOR, vp.height * ZOOM_FACTOR)
		};
		let (bias_x, bias_y) = (bias_x.clamp(0.0, 1.0), bias_y.clamp(0.0, 1.0));
		match Viewport::new(
			vp.x + (vp.width - w) * bias_x,
			vp.y + (vp.height - h) * bias_y,
			w,
			h,
		) {
			Ok(next) => self.viewport = next,
			Err(err) => debug!("zoom step rejected: {err}"),
		}
	}

	/// Frames every point with `padding` split evenly on both sides, or
	/// restores the default viewport when there is nothing to frame.
	pub fn reset_to_fit<I>(&mut self, points: I, padding: f64)
	where
		I: IntoIterator<Item = Point>,
	{
		let mut points = points.into_iter();
		let Some(first) = points.next() else {
			self.viewport = DEFAULT_VIEWPORT;
			return;
		};
		let (mut min, mut max) = (first, first);
		for p in points {
			min = Point::new(min.x.min(p.x), min.y.min(p.y));
			max = Point::new(max.x.max(p.x), max.y.max(p.y));
		}

		let padding = padding.max(0.0);
		let width = (max.x - min.x + padding).max(MIN_EXTENT);
		let height = (max.y - min.y + padding).max(MIN_EXTENT);
		let center = Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
		self.viewport = Viewport::new(
			center.x - width / 2.0,
			center.y - height / 2.0,
			width,
			height,
		)
		.unwrap_or_else(|err| {
			debug!("fit fell back to default viewport: {err}");
			DEFAULT_VIEWPORT
		});
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn fit_two_nodes() {
		let mut camera = Camera::new();
		camera.reset_to_fit([Point::new(0.0, 0.0), Point::new(100.0, 100.0)], FIT_PADDING);
		assert_eq!(
			camera.viewport,
			Viewport {
				x: -50.0,
				y: -50.0,
				width: 200.0,
				height: 200.0
			}
		);
	}

	#[test]
	fn fit_empty_restores_default() {
		let mut camera = Camera::new();
		camera.zoom(-1.0);
		camera.reset_to_fit(std::iter::empty(), FIT_PADDING);
		assert_eq!(camera.viewport, DEFAULT_VIEWPORT);
	}

	#[test]
	fn fit_single_node_without_padding_stays_positive() {
		let mut camera = Camera::new();
		camera.reset_to_fit([Point::new(3.0, 4.0)], 0.0);
		assert_eq!(camera.viewport.width, MIN_EXTENT);
		assert_eq!(camera.viewport.center(), Point::new(3.0, 4.0));
	}

	#[test]
	fn pan_moves_viewport_against_pointer() {
		let mut camera = Camera::new();
		camera.begin_pan(Point::new(10.0, 10.0), &PointerTarget::Background);
		camera.continue_pan(Point::new(30.0, 5.0));
		assert_eq!(camera.viewport.x, DEFAULT_VIEWPORT.x - 20.0);
		assert_eq!(camera.viewport.y, DEFAULT_VIEWPORT.y + 5.0);
		camera.continue_pan(Point::new(40.0, 5.0));
		assert_eq!(camera.viewport.x, DEFAULT_VIEWPORT.x - 30.0);

		camera.end_pan();
		camera.continue_pan(Point::new(100.0, 100.0));
		assert_eq!(camera.viewport.x, DEFAULT_VIEWPORT.x - 30.0);
	}

	#[test]
	fn pan_ignores_presses_on_nodes() {
		let mut camera = Camera::new();
		camera.begin_pan(Point::default(), &PointerTarget::Node(NodeId::Num(1)));
		assert!(!camera.is_panning());
		camera.continue_pan(Point::new(50.0, 50.0));
		assert_eq!(camera.viewport, DEFAULT_VIEWPORT);
	}

	#[test]
	fn non_finite_pointer_never_moves_the_viewport() {
		let mut camera = Camera::new();
		camera.begin_pan(Point::new(f64::INFINITY, 0.0), &PointerTarget::Background);
		assert!(!camera.is_panning());

		camera.begin_pan(Point::new(10.0, 10.0), &PointerTarget::Background);
		camera.continue_pan(Point::new(f64::NAN, 20.0));
		camera.continue_pan(Point::new(20.0, f64::INFINITY));
		assert_eq!(camera.viewport, DEFAULT_VIEWPORT);

		camera.continue_pan(Point::new(15.0, 10.0));
		assert_eq!(camera.viewport.x, DEFAULT_VIEWPORT.x - 5.0);
		assert_eq!(camera.viewport.y, DEFAULT_VIEWPORT.y);
	}

	#[test]
	fn zoom_keeps_center() {
		let mut camera = Camera::new();
		let center = camera.viewport.center();
		camera.zoom(-3.0);
		assert!((camera.viewport.width - 2000.0 / ZOOM_FACTOR).abs() < 1e-9);
		let after = camera.viewport.center();
		assert!((after.x - center.x).abs() < 1e-9 && (after.y - center.y).abs() < 1e-9);
		camera.zoom(3.0);
		assert!((camera.viewport.width - 2000.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_with_zero_delta_is_noop() {
		let mut camera = Camera::new();
		camera.zoom(0.0);
		assert_eq!(camera.viewport, DEFAULT_VIEWPORT);
	}

	#[test]
	fn screen_transform_round_trips_center() {
		let vp = Viewport::new(0.0, 0.0, 100.0, 50.0).unwrap();
		let t = vp.screen_transform(400.0, 400.0);
		assert_eq!(t.k, 4.0);
		assert_eq!(t.screen_to_graph(200.0, 200.0), vp.center());
	}

	#[test]
	fn degenerate_viewport_is_rejected() {
		assert!(Viewport::new(0.0, 0.0, 0.0, 10.0).is_err());
		assert!(Viewport::new(0.0, 0.0, f64::INFINITY, 10.0).is_err());
	}

	proptest! {
		#[test]
		fn zoom_never_degenerates(steps in proptest::collection::vec(-1.0f64..1.0, 0..400)) {
			let mut camera = Camera::new();
			for step in steps {
				camera.zoom(step * 1e3);
				let vp = camera.viewport;
				prop_assert!(vp.width.is_finite() && vp.width >= MIN_EXTENT);
				prop_assert!(vp.height.is_finite() && vp.height >= MIN_EXTENT);
			}
		}
	}
}

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::bundle::{EdgeShape, LineEdge, LoopEdge};
use super::state::{CanvasState, NODE_RADIUS};
use super::types::{CanvasNode, Point};

const BACKGROUND: &str = "#1a1a2e";
const DEFAULT_EDGE_COLOR: &str = "rgba(100, 180, 255, 0.8)";
const LOOP_RADIUS: f64 = 14.0;

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let frame = state.frame();
	let t = frame.viewport.screen_transform(state.width, state.height);

	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	let k = t.k;
	for edge in &frame.edges {
		match edge {
			EdgeShape::Line(line) => draw_line(line, frame.directed, k, ctx),
			EdgeShape::Loop(lp) => draw_loop(lp, frame.directed, k, ctx),
		}
	}
	for node in frame.nodes {
		draw_node(node, k, ctx);
	}
	ctx.restore();
}

fn edge_color(color: &str) -> &str {
	if color.is_empty() { DEFAULT_EDGE_COLOR } else { color }
}

fn set_dash(dashed: bool, k: f64, ctx: &CanvasRenderingContext2d) {
	let pattern = if dashed {
		js_sys::Array::of2(&JsValue::from_f64(8.0 / k), &JsValue::from_f64(4.0 / k))
	} else {
		js_sys::Array::new()
	};
	let _ = ctx.set_line_dash(&pattern);
}

fn draw_arrow(tip: Point, ux: f64, uy: f64, size: f64, ctx: &CanvasRenderingContext2d) {
	let (back_x, back_y) = (tip.x - ux * size, tip.y - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_weight(weight: Option<f64>, at: Point, k: f64, ctx: &CanvasRenderingContext2d) {
	let Some(weight) = weight else {
		return;
	};
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
	let _ = ctx.fill_text(&weight.to_string(), at.x + 4.0, at.y - 4.0);
}

/// Quadratic curve whose control point sits `delta` away from the midpoint
/// along the from->to normal.
fn draw_line(edge: &LineEdge, directed: bool, k: f64, ctx: &CanvasRenderingContext2d) {
	let (start, end) = (edge.start, edge.end);
	let (dx, dy) = (end.x - start.x, end.y - start.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let control = Point::new(
		(start.x + end.x) / 2.0 - uy * edge.delta,
		(start.y + end.y) / 2.0 + ux * edge.delta,
	);
	let arrow_size = 10.0;

	let color = edge_color(&edge.attrs.color);
	ctx.set_stroke_style_str(color);
	ctx.set_fill_style_str(color);
	ctx.set_line_width(1.5 / k.max(0.25));
	set_dash(edge.attrs.dashed, k, ctx);

	// Leave the curve along its end tangents so it meets the node rims.
	let tangent = |from: Point, to: Point| {
		let (tx, ty) = (to.x - from.x, to.y - from.y);
		let len = (tx * tx + ty * ty).sqrt().max(0.001);
		(tx / len, ty / len)
	};
	let (sx, sy) = tangent(start, control);
	let (ex, ey) = tangent(control, end);
	let tip = Point::new(end.x - ex * NODE_RADIUS, end.y - ey * NODE_RADIUS);
	let stop = if directed {
		Point::new(tip.x - ex * arrow_size, tip.y - ey * arrow_size)
	} else {
		tip
	};

	ctx.begin_path();
	ctx.move_to(start.x + sx * NODE_RADIUS, start.y + sy * NODE_RADIUS);
	ctx.quadratic_curve_to(control.x, control.y, stop.x, stop.y);
	ctx.stroke();
	set_dash(false, k, ctx);

	if directed {
		draw_arrow(tip, ex, ey, arrow_size, ctx);
	}
	let apex = Point::new(
		(start.x + 2.0 * control.x + end.x) / 4.0,
		(start.y + 2.0 * control.y + end.y) / 4.0,
	);
	draw_weight(edge.attrs.weight, apex, k, ctx);
}

/// Circle resting on top of the node; later loops on the same node nest
/// outside earlier ones.
fn draw_loop(edge: &LoopEdge, directed: bool, k: f64, ctx: &CanvasRenderingContext2d) {
	let radius = LOOP_RADIUS * (1.0 + edge.rank as f64 * 0.6);
	let center = Point::new(edge.at.x, edge.at.y - NODE_RADIUS - radius * 0.6);

	let color = edge_color(&edge.attrs.color);
	ctx.set_stroke_style_str(color);
	ctx.set_fill_style_str(color);
	ctx.set_line_width(1.5 / k.max(0.25));
	set_dash(edge.attrs.dashed, k, ctx);
	ctx.begin_path();
	let _ = ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
	ctx.stroke();
	set_dash(false, k, ctx);

	if directed {
		let tip = Point::new(center.x + radius, center.y);
		draw_arrow(tip, 0.0, 1.0, 8.0, ctx);
	}
	draw_weight(
		edge.attrs.weight,
		Point::new(center.x + radius, center.y - radius),
		k,
		ctx,
	);
}

fn draw_node(node: &CanvasNode, k: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.pos.x, node.pos.y);
	ctx.begin_path();
	let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(if node.color.is_empty() { "#1f77b4" } else { node.color.as_str() });
	ctx.fill();
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_line_width(1.0 / k.max(0.25));
	ctx.stroke();

	let text = node.label.clone().unwrap_or_else(|| node.id.to_string());
	ctx.set_fill_style_str("white");
	ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
	let _ = ctx.fill_text(&text, x + NODE_RADIUS + 3.0, y + 4.0);
}

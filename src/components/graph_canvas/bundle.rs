//! Fans out parallel edges and stacks self-loops.
//!
//! Edges sharing an unordered endpoint pair are ranked in a stable order and
//! the ranks are centered on zero, so an odd bundle keeps one straight edge
//! and an even bundle bends every edge symmetrically. The sign of each rank
//! is then fixed to the canonical orientation of the pair and to which
//! endpoint is currently on the left, so a curve stays on the same side no
//! matter how the edge was declared or where its endpoints were dragged.

use std::collections::HashMap;

use log::debug;

use super::error::{CanvasError, Result};
use super::geometry::{EdgeKey, left_side};
use super::types::{EdgeAttrs, EdgeSpec, NodeId, NodeStore, Point};

/// Pixels between neighbouring edges of a bundle.
pub const EDGE_SPREAD: f64 = 40.0;

/// Position of an edge inside its bundle.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedEdge<'a> {
	pub edge: &'a EdgeSpec,
	pub key: EdgeKey,
	/// Encounter index inside the bundle, starting at 0.
	pub rank: usize,
	/// Rank shifted so the bundle is symmetric around zero. Zero is only
	/// used by odd bundles.
	pub centered: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineEdge {
	pub from: NodeId,
	pub to: NodeId,
	pub start: Point,
	pub end: Point,
	pub attrs: EdgeAttrs,
	/// Signed rank after both orientation flips.
	pub rank: i64,
	/// Perpendicular offset of the curve's control point.
	pub delta: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoopEdge {
	pub node: NodeId,
	pub at: Point,
	pub attrs: EdgeAttrs,
	/// Loops on the same node are drawn nested by this index.
	pub rank: usize,
}

/// Renderable descriptor of one edge.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeShape {
	Line(LineEdge),
	Loop(LoopEdge),
}

/// Ranks every edge within its bundle. The result is ordered by key, with
/// declaration order preserved inside each bundle.
pub fn rank_edges(edges: &[EdgeSpec]) -> Vec<RankedEdge<'_>> {
	let mut keyed: Vec<(EdgeKey, &EdgeSpec)> = edges
		.iter()
		.map(|edge| (EdgeKey::new(&edge.from, &edge.to), edge))
		.collect();
	keyed.sort_by(|a, b| a.0.cmp(&b.0));

	let mut max_rank: HashMap<EdgeKey, usize> = HashMap::new();
	let mut ranked = Vec::with_capacity(keyed.len());
	let mut rank = 0;
	for (key, edge) in keyed {
		rank = match ranked.last() {
			Some(RankedEdge { key: prev, .. }) if *prev == key => rank + 1,
			_ => 0,
		};
		max_rank.insert(key.clone(), rank);
		ranked.push(RankedEdge {
			edge,
			key,
			rank,
			centered: 0,
		});
	}

	for r in &mut ranked {
		r.centered = center_rank(r.rank, max_rank[&r.key]);
	}
	ranked
}

/// Odd bundles: `rank - ceil(max_rank / 2)`, which spans `-k..=k`. Even
/// bundles skip zero and span `-k..=-1, 1..=k`.
fn center_rank(rank: usize, max_rank: usize) -> i64 {
	let (rank, max_rank) = (rank as i64, max_rank as i64);
	let centered = rank - (max_rank + 1) / 2;
	if max_rank % 2 == 1 && centered >= 0 {
		centered + 1
	} else {
		centered
	}
}

/// Offset of one non-loop edge given both endpoint positions.
fn oriented_rank(ranked: &RankedEdge<'_>, from: Point, to: Point) -> i64 {
	let mut rank = ranked.centered;
	let reversed = ranked.edge.from > ranked.edge.to;
	if reversed {
		rank = -rank;
	}
	let (lo, hi) = if reversed { (to, from) } else { (from, to) };
	if !left_side(lo, hi) {
		rank = -rank;
	}
	rank
}

fn shape(ranked: &RankedEdge<'_>, nodes: &NodeStore) -> Result<EdgeShape> {
	let edge = ranked.edge;
	let (Some(start), Some(end)) = (nodes.position(&edge.from), nodes.position(&edge.to)) else {
		return Err(CanvasError::DanglingEdge {
			from: edge.from.clone(),
			to: edge.to.clone(),
		});
	};

	if edge.is_loop() {
		return Ok(EdgeShape::Loop(LoopEdge {
			node: edge.from.clone(),
			at: start,
			attrs: edge.attrs.clone(),
			rank: ranked.rank,
		}));
	}

	let rank = oriented_rank(ranked, start, end);
	Ok(EdgeShape::Line(LineEdge {
		from: edge.from.clone(),
		to: edge.to.clone(),
		start,
		end,
		attrs: edge.attrs.clone(),
		rank,
		delta: -EDGE_SPREAD * rank as f64,
	}))
}

/// Builds the edge shapes for one frame. Edges whose endpoints are not on
/// the canvas still take part in ranking but are left out of the result.
pub fn bundle_edges(edges: &[EdgeSpec], nodes: &NodeStore) -> Vec<EdgeShape> {
	rank_edges(edges)
		.iter()
		.filter_map(|ranked| match shape(ranked, nodes) {
			Ok(shape) => Some(shape),
			Err(err) => {
				debug!("skipping edge: {err}");
				None
			}
		})
		.collect()
}

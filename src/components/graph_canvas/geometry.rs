use rand::Rng;

use super::types::{NodeId, Point};

/// Half-width of the square new nodes are scattered into.
pub const SPAWN_BOUND: f64 = 500.0;

/// True when `a` lies on the left of `b`: lower x wins, ties go to lower y.
pub fn left_side(a: Point, b: Point) -> bool {
	if a.x == b.x {
		return a.y < b.y;
	}
	a.x < b.x
}

/// Order-independent key of an endpoint pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
	pub lo: NodeId,
	pub hi: NodeId,
}

impl EdgeKey {
	pub fn new(from: &NodeId, to: &NodeId) -> Self {
		let (lo, hi) = if from > to { (to, from) } else { (from, to) };
		Self {
			lo: lo.clone(),
			hi: hi.clone(),
		}
	}
}

/// Uniform point in `[-bound, bound]` on both axes.
pub fn random_point<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> Point {
	if bound <= 0.0 {
		return Point::default();
	}
	Point::new(rng.gen_range(-bound..=bound), rng.gen_range(-bound..=bound))
}

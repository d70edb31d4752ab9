use thiserror::Error;

use super::types::NodeId;

/// Anomalies the engine absorbs. None of these ever reach the host; they are
/// logged and the caller falls back to a safe state.
#[derive(Debug, Error, PartialEq)]
pub enum CanvasError {
	#[error("edge {from} -> {to} references a node that is not on the canvas")]
	DanglingEdge { from: NodeId, to: NodeId },
	#[error("viewport {width}x{height} is degenerate")]
	DegenerateViewport { width: f64, height: f64 },
	#[error("node {0} is not on the canvas")]
	UnknownNode(NodeId),
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;

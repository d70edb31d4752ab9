mod bundle;
mod camera;
mod component;
mod error;
mod geometry;
mod layout;
mod propagate;
mod reconcile;
mod render;
mod state;
mod types;

pub use component::GraphCanvas;
pub use types::{EdgeAttrs, EdgeSpec, GraphDescription, NodeId, NodeSpec};

//! WebGPU rendering module
//!
//! `scene` turns game state into a board-space triangle list; `pipeline`
//! maps it to the viewport and draws it in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, board_to_ndc, viewport_to_board};
pub use scene::build_scene;
pub use vertex::Vertex;

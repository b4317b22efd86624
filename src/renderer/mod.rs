//! WebGPU rendering module
//!
//! The scene is rebuilt as a flat triangle list every frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::scene_vertices;
pub use vertex::Vertex;

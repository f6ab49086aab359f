//! WebGPU rendering module
//!
//! Draw commands are tessellated into a `ShapeBatch`, which the pipeline
//! uploads and presents once per frame.

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use batch::ShapeBatch;
pub use pipeline::RenderState;

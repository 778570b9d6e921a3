pub mod camera;
pub mod dispatch;
pub mod traits;

// Re-export key types for convenient access
pub use traits::{MeshHandle, Meshes, ProgramHandle, Programs, RenderBackend, UniformValue};

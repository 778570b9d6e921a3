pub mod api;
pub mod bridge;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{
    AssetPaths, CameraConfig, ConfigError, KeyBindings, LightingConfig, OrbitConfig,
    PhasePolicy, ProjectionConfig, UniformNames, ViewerConfig, WindowConfig,
};
pub use api::types::{Body, Viewport};
pub use api::viewer::{LoopState, SceneState, Viewer};
pub use bridge::protocol::{Command, CommandBuffer};
pub use core::scene::{normal_matrix, BodyTransform, ComposedScene, SceneComposer};
pub use core::time::{Clock, FrameTiming, ThresholdStepper};
pub use input::pending::{FrameInput, MovementKeys, PendingInput};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::camera::{CameraMovement, FlyCamera};
pub use renderer::dispatch::RenderDispatcher;
pub use renderer::traits::{
    MeshHandle, Meshes, ProgramHandle, Programs, RenderBackend, UniformValue,
};
pub use systems::orbit::{body_offsets, earth_spin, BodyOffsets, OrbitAnimator, OrbitParams, OrbitState};

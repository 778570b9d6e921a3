//! Render backend contract.
//!
//! Shader compilation, mesh loading and the GPU context all live on the
//! host side. The engine only needs to pick a program, set named uniforms
//! on it and ask for a mesh to be drawn. Handles are opaque numbers the host
//! assigns when it loads its resources.

use glam::{Mat4, Vec3, Vec4};

/// Opaque handle to a compiled shading program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Opaque handle to a loaded mesh (with its textures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// A value uploaded to a named uniform on the active program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

/// Renderer trait for host graphics backends.
///
/// Calls arrive in frame order on the render thread. None of them can fail:
/// anything fallible (context creation, compilation, loading) happened
/// before the loop started.
pub trait RenderBackend {
    /// Clear color and depth for a new frame.
    fn clear(&mut self, color: [f32; 4]);

    /// Make `program` the target of subsequent `set_uniform` calls.
    fn activate(&mut self, program: ProgramHandle);

    /// Set a uniform on the active program.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Draw `mesh` with `program` (which is already active).
    fn draw(&mut self, mesh: MeshHandle, program: ProgramHandle);

    /// Finish the frame (swap buffers). Default: nothing to do.
    fn present(&mut self) {}
}

/// Programs the dispatcher switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Programs {
    /// Emissive program for the light source.
    pub light: ProgramHandle,
    /// Lit program for bodies that receive light.
    pub lit: ProgramHandle,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            light: ProgramHandle(0),
            lit: ProgramHandle(1),
        }
    }
}

/// One mesh per body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meshes {
    pub sun: MeshHandle,
    pub earth: MeshHandle,
    pub moon: MeshHandle,
}

impl Default for Meshes {
    fn default() -> Self {
        Self {
            sun: MeshHandle(0),
            earth: MeshHandle(1),
            moon: MeshHandle(2),
        }
    }
}

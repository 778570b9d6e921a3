use glam::{Vec3, Vec4};

use crate::api::config::{LightingConfig, ProjectionConfig, UniformNames};
use crate::api::types::Viewport;
use crate::core::scene::{BodyTransform, ComposedScene};
use crate::renderer::camera::FlyCamera;
use crate::renderer::traits::{MeshHandle, Meshes, Programs, RenderBackend};

/// Binds programs, uploads uniforms and issues the draws for one frame.
///
/// Order is fixed: clear, the sun with the light-source program, then the
/// moon and earth with the lit program. Draw order only needs to be stable;
/// the hierarchy is already baked into the composed matrices.
#[derive(Debug, Clone)]
pub struct RenderDispatcher {
    programs: Programs,
    meshes: Meshes,
    names: UniformNames,
    projection: ProjectionConfig,
    sun_color: Vec4,
    light_color: Vec3,
    clear_color: [f32; 4],
    /// Fixed light position: the sun's configured offset, not its
    /// composed matrix.
    light_pos: Vec3,
}

impl RenderDispatcher {
    pub fn new(
        programs: Programs,
        meshes: Meshes,
        names: UniformNames,
        projection: ProjectionConfig,
        lighting: &LightingConfig,
        light_pos: Vec3,
    ) -> Self {
        Self {
            programs,
            meshes,
            names,
            projection,
            sun_color: Vec4::from_array(lighting.sun_color),
            light_color: Vec3::from_array(lighting.light_color),
            clear_color: lighting.clear_color,
            light_pos,
        }
    }

    /// Point each program's sampler at its texture unit. Once, at startup.
    pub fn bind_samplers(&self, backend: &mut impl RenderBackend) {
        backend.activate(self.programs.lit);
        backend.set_uniform(&self.names.lit_sampler, self.names.lit_texture_unit.into());
        backend.activate(self.programs.light);
        backend.set_uniform(&self.names.light_sampler, self.names.light_texture_unit.into());
    }

    pub fn render(
        &self,
        backend: &mut impl RenderBackend,
        camera: &FlyCamera,
        scene: &ComposedScene,
        viewport: Viewport,
    ) {
        let names = &self.names;
        let projection =
            camera.projection_matrix(viewport.aspect(), self.projection.near, self.projection.far);
        let view = camera.view_matrix();

        backend.clear(self.clear_color);

        // Light source
        let light = self.programs.light;
        backend.activate(light);
        backend.set_uniform(&names.projection, projection.into());
        backend.set_uniform(&names.view, view.into());
        backend.set_uniform(&names.model, scene.sun.into());
        backend.set_uniform(&names.color, self.sun_color.into());
        backend.draw(self.meshes.sun, light);

        // Lit bodies
        let lit = self.programs.lit;
        backend.activate(lit);
        backend.set_uniform(&names.projection, projection.into());
        backend.set_uniform(&names.view, view.into());
        backend.set_uniform(&names.light_pos, self.light_pos.into());
        backend.set_uniform(&names.light_color, self.light_color.into());
        backend.set_uniform(&names.view_pos, camera.position.into());

        self.draw_lit(backend, &scene.moon, self.meshes.moon);
        self.draw_lit(backend, &scene.earth, self.meshes.earth);
    }

    fn draw_lit(
        &self,
        backend: &mut impl RenderBackend,
        body: &BodyTransform,
        mesh: MeshHandle,
    ) {
        backend.set_uniform(&self.names.model, body.model.into());
        backend.set_uniform(&self.names.normal_matrix, body.normal.into());
        backend.draw(mesh, self.programs.lit);
    }
}

use glam::{Mat4, Vec3};

use crate::api::config::OrbitConfig;
use crate::api::types::Body;
use crate::systems::orbit::{body_offsets, earth_spin, OrbitParams};

/// Model matrix of a lit body plus its normal matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub model: Mat4,
    /// `transpose(inverse(model))`, for transforming surface normals.
    pub normal: Mat4,
}

impl BodyTransform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model,
            normal: normal_matrix(&model),
        }
    }
}

/// Inverse-transpose of the full 4x4 model matrix.
pub fn normal_matrix(model: &Mat4) -> Mat4 {
    model.inverse().transpose()
}

/// All model matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedScene {
    /// The sun is unlit, so it carries no normal matrix.
    pub sun: Mat4,
    pub earth: BodyTransform,
    pub moon: BodyTransform,
}

impl ComposedScene {
    pub fn model(&self, body: Body) -> Mat4 {
        match body {
            Body::Sun => self.sun,
            Body::Earth => self.earth.model,
            Body::Moon => self.moon.model,
        }
    }

    pub fn world_position(&self, body: Body) -> Vec3 {
        self.model(body).w_axis.truncate()
    }
}

/// Builds the sun → earth → moon transform hierarchy.
///
/// Pure: the output depends only on the fixed layout and the phase angle.
/// Every frame is composed from scratch; nothing but the phase carries over.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneComposer {
    sun_offset: Vec3,
    params: OrbitParams,
}

impl SceneComposer {
    pub fn new(sun_offset: Vec3, params: OrbitParams) -> Self {
        Self { sun_offset, params }
    }

    pub fn from_config(config: &OrbitConfig) -> Self {
        Self::new(Vec3::from_array(config.sun_offset), OrbitParams::from(config))
    }

    /// Compose the scene at phase angle `theta`.
    ///
    /// Earth is translated into the sun's frame and then spun; the moon is
    /// translated inside earth's spun frame, so earth's spin carries the
    /// moon around with it.
    pub fn compose(&self, theta: f32) -> ComposedScene {
        let offsets = body_offsets(&self.params, theta);

        let sun = Mat4::from_translation(self.sun_offset);
        let earth = sun
            * Mat4::from_translation(offsets.earth)
            * Mat4::from_rotation_y(earth_spin(&self.params, theta));
        let moon = earth * Mat4::from_translation(offsets.moon);

        ComposedScene {
            sun,
            earth: BodyTransform::new(earth),
            moon: BodyTransform::new(moon),
        }
    }

    /// Fixed sun position. Lighting uses this rather than the composed matrix.
    pub fn sun_offset(&self) -> Vec3 {
        self.sun_offset
    }
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self::from_config(&OrbitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_origin() -> SceneComposer {
        SceneComposer::new(Vec3::ZERO, OrbitParams::default())
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn zero_phase_is_pure_translation() {
        let scene = at_origin().compose(0.0);
        assert_eq!(scene.sun, Mat4::IDENTITY);
        assert_eq!(scene.earth.model, Mat4::from_translation(Vec3::new(30.0, 0.0, 0.0)));
        assert_eq!(scene.moon.model, Mat4::from_translation(Vec3::new(50.0, 0.0, 0.0)));
    }

    #[test]
    fn sun_offset_carries_children() {
        let scene = SceneComposer::default().compose(0.0);
        assert_eq!(scene.world_position(Body::Sun), Vec3::new(0.0, 0.0, -60.0));
        assert_eq!(scene.world_position(Body::Earth), Vec3::new(30.0, 0.0, -60.0));
        assert_eq!(scene.world_position(Body::Moon), Vec3::new(50.0, 0.0, -60.0));
    }

    #[test]
    fn compose_is_deterministic() {
        let composer = SceneComposer::default();
        for theta in [0.0, 0.001, 0.5, 3.0, 100.0] {
            assert_eq!(composer.compose(theta), composer.compose(theta));
        }
    }

    #[test]
    fn earth_stays_on_its_orbit() {
        let composer = at_origin();
        for theta in [0.1, 0.7, 2.0] {
            let earth = composer.compose(theta).world_position(Body::Earth);
            assert!((earth.length() - 30.0).abs() < 1e-3);
            assert_eq!(earth.y, 0.0);
        }
    }

    #[test]
    fn moon_follows_earth_spin() {
        let theta = 0.2;
        let spun = at_origin().compose(theta);
        let unspun = SceneComposer::new(
            Vec3::ZERO,
            OrbitParams { earth_spin_rate: 0.0, ..OrbitParams::default() },
        )
        .compose(theta);

        // Same moon offset, same earth position, different moon position.
        assert!(approx(spun.world_position(Body::Earth), unspun.world_position(Body::Earth)));
        assert!(!approx(spun.world_position(Body::Moon), unspun.world_position(Body::Moon)));

        // The moon's offset is rotated by earth's spin before being added.
        let offsets = body_offsets(&OrbitParams::default(), theta);
        let expected = spun.world_position(Body::Earth)
            + Mat4::from_rotation_y(30.0 * theta).transform_vector3(offsets.moon);
        assert!(approx(spun.world_position(Body::Moon), expected));
    }

    #[test]
    fn normal_matrix_is_inverse_transpose() {
        let scene = SceneComposer::default().compose(1.3);
        let product = scene.moon.normal.transpose() * scene.moon.model;
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn normal_matrix_handles_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 0.5));
        let normal = normal_matrix(&model);
        // A 45° surface normal in XY must tilt towards the shrunk axis.
        let n = normal.transform_vector3(Vec3::new(1.0, 1.0, 0.0)).normalize();
        assert!(n.y > n.x);
        // Normals stay perpendicular to transformed tangents.
        let tangent = model.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(n.dot(tangent).abs() < 1e-5);
    }

    #[test]
    fn rigid_normal_matrix_matches_rotation() {
        let scene = at_origin().compose(0.4);
        let rotated = scene.earth.normal.transform_vector3(Vec3::X);
        let expected = scene.earth.model.transform_vector3(Vec3::X);
        assert!(approx(rotated, expected));
    }
}

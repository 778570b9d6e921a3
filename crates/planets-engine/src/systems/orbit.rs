//! Orbit animation: a toggle plus a single accumulated phase angle.
//!
//! Every orbit and spin in the scene is a multiple of the phase angle, so
//! pausing freezes the whole tableau and resuming continues where it left off.

use glam::Vec3;

use crate::api::config::{OrbitConfig, PhasePolicy};
use crate::core::time::ThresholdStepper;

/// Radii and rate multipliers of the parametric orbits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    pub earth_radius: f32,
    pub moon_radius: f32,
    /// k_e: earth's orbital angle is `k_e * θ`.
    pub earth_orbit_rate: f32,
    /// k_r: earth's spin angle is `k_r * θ`.
    pub earth_spin_rate: f32,
}

impl From<&OrbitConfig> for OrbitParams {
    fn from(config: &OrbitConfig) -> Self {
        Self {
            earth_radius: config.earth_radius,
            moon_radius: config.moon_radius,
            earth_orbit_rate: config.earth_orbit_rate,
            earth_spin_rate: config.earth_spin_rate,
        }
    }
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self::from(&OrbitConfig::default())
    }
}

/// Local offsets of the orbiting bodies for one phase angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyOffsets {
    /// Earth relative to the sun.
    pub earth: Vec3,
    /// Moon relative to earth's (spun) frame.
    pub moon: Vec3,
}

/// Counter-clockwise (seen from +Y) circle in the XZ plane.
fn circle_xz(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, -radius * angle.sin())
}

/// Body offsets at phase angle `theta`.
pub fn body_offsets(params: &OrbitParams, theta: f32) -> BodyOffsets {
    BodyOffsets {
        earth: circle_xz(params.earth_radius, params.earth_orbit_rate * theta),
        moon: circle_xz(params.moon_radius, theta),
    }
}

/// Earth's spin about the vertical axis at phase angle `theta`, in radians.
pub fn earth_spin(params: &OrbitParams, theta: f32) -> f32 {
    params.earth_spin_rate * theta
}

/// Snapshot of the animation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub active: bool,
    /// Radians. Never decreases and is never reset.
    pub phase_angle: f32,
}

#[derive(Debug, Clone)]
enum Advance {
    Threshold { gate: ThresholdStepper, step: f32 },
    Continuous { rate: f32 },
}

/// Advances the phase angle while active.
#[derive(Debug, Clone)]
pub struct OrbitAnimator {
    params: OrbitParams,
    active: bool,
    phase_angle: f32,
    advance: Advance,
}

impl OrbitAnimator {
    pub fn new(config: &OrbitConfig) -> Self {
        let advance = match config.policy {
            PhasePolicy::Threshold { interval, step } => Advance::Threshold {
                gate: ThresholdStepper::new(interval),
                step,
            },
            PhasePolicy::Continuous { rate } => Advance::Continuous { rate },
        };
        Self {
            params: OrbitParams::from(config),
            active: config.start_active,
            phase_angle: 0.0,
            advance,
        }
    }

    /// Flip the animation on or off. Call once per press edge.
    pub fn toggle(&mut self) {
        self.active = !self.active;
        log::debug!(
            "orbit animation {} at phase {:.4}",
            if self.active { "resumed" } else { "paused" },
            self.phase_angle
        );
    }

    /// Advance the phase by one frame of `dt` seconds. Frozen while inactive.
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let dt = dt.max(0.0);
        match &mut self.advance {
            Advance::Threshold { gate, step } => {
                if gate.accumulate(dt) {
                    self.phase_angle += *step;
                }
            }
            Advance::Continuous { rate } => {
                self.phase_angle += *rate * dt;
            }
        }
    }

    pub fn state(&self) -> OrbitState {
        OrbitState {
            active: self.active,
            phase_angle: self.phase_angle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase_angle(&self) -> f32 {
        self.phase_angle
    }

    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    /// Offsets at the current phase angle.
    pub fn body_offsets(&self) -> BodyOffsets {
        body_offsets(&self.params, self.phase_angle)
    }

    pub fn earth_spin(&self) -> f32 {
        earth_spin(&self.params, self.phase_angle)
    }
}

impl Default for OrbitAnimator {
    fn default() -> Self {
        Self::new(&OrbitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 0.001;
    const FRAME: f32 = 1.0 / 65.0;

    fn continuous(rate: f32) -> OrbitAnimator {
        OrbitAnimator::new(&OrbitConfig {
            policy: PhasePolicy::Continuous { rate },
            ..OrbitConfig::default()
        })
    }

    #[test]
    fn starts_paused_at_zero() {
        let orbit = OrbitAnimator::default();
        assert_eq!(orbit.state(), OrbitState { active: false, phase_angle: 0.0 });
    }

    #[test]
    fn frozen_while_inactive() {
        let mut orbit = OrbitAnimator::default();
        for _ in 0..100 {
            orbit.advance(FRAME);
        }
        assert_eq!(orbit.phase_angle(), 0.0);
    }

    #[test]
    fn threshold_adds_exactly_one_step() {
        let mut orbit = OrbitAnimator::default();
        orbit.toggle();
        orbit.advance(FRAME);
        assert_eq!(orbit.phase_angle(), STEP);
    }

    #[test]
    fn threshold_waits_for_interval() {
        let mut orbit = OrbitAnimator::default();
        orbit.toggle();
        let mut frames = 0;
        while orbit.phase_angle() == 0.0 {
            orbit.advance(FRAME / 4.0);
            frames += 1;
            assert!(frames <= 8, "threshold never fired");
        }
        assert_eq!(orbit.phase_angle(), STEP);
    }

    #[test]
    fn long_frame_is_still_one_step() {
        let mut orbit = OrbitAnimator::default();
        orbit.toggle();
        orbit.advance(1.0);
        assert_eq!(orbit.phase_angle(), STEP);
    }

    #[test]
    fn continuous_scales_with_time() {
        let mut orbit = continuous(0.5);
        orbit.toggle();
        orbit.advance(0.25);
        orbit.advance(0.25);
        assert!((orbit.phase_angle() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn monotonic_while_active() {
        let mut orbit = continuous(2.0);
        orbit.toggle();
        let mut last = orbit.phase_angle();
        for dt in [0.0, 0.016, 0.5, 0.0, 0.001, 3.0] {
            orbit.advance(dt);
            assert!(orbit.phase_angle() >= last);
            last = orbit.phase_angle();
        }
        // A negative delta never rewinds.
        orbit.advance(-1.0);
        assert_eq!(orbit.phase_angle(), last);
    }

    #[test]
    fn double_toggle_restores_state() {
        let mut orbit = continuous(1.0);
        orbit.toggle();
        orbit.advance(0.3);
        let before = orbit.state();
        orbit.toggle();
        orbit.toggle();
        assert_eq!(orbit.state(), before);
    }

    #[test]
    fn phase_persists_across_pause() {
        let mut orbit = continuous(1.0);
        orbit.toggle();
        orbit.advance(0.5);
        orbit.toggle();
        orbit.advance(10.0);
        assert!((orbit.phase_angle() - 0.5).abs() < 1e-6);
        orbit.toggle();
        orbit.advance(0.5);
        assert!((orbit.phase_angle() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn offsets_at_zero_phase() {
        let offsets = body_offsets(&OrbitParams::default(), 0.0);
        assert_eq!(offsets.earth, Vec3::new(30.0, 0.0, 0.0));
        assert_eq!(offsets.moon, Vec3::new(20.0, 0.0, 0.0));
    }

    #[test]
    fn earth_orbits_faster_than_moon() {
        let params = OrbitParams::default();
        let theta = std::f32::consts::FRAC_PI_2 / 5.0;
        let offsets = body_offsets(&params, theta);
        // Earth has travelled a quarter turn: (0, 0, -R_e).
        assert!((offsets.earth - Vec3::new(0.0, 0.0, -30.0)).length() < 1e-4);
        assert!((offsets.moon.length() - 20.0).abs() < 1e-4);
        assert!(offsets.moon.z < 0.0);
        assert!((earth_spin(&params, theta) - 30.0 * theta).abs() < 1e-6);
    }
}

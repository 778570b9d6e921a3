use glam::Vec2;

use crate::api::config::{ConfigError, ViewerConfig};
use crate::api::types::Viewport;
use crate::core::scene::{ComposedScene, SceneComposer};
use crate::core::time::{Clock, FrameTiming};
use crate::input::pending::{FrameInput, PendingInput};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::FlyCamera;
use crate::renderer::dispatch::RenderDispatcher;
use crate::renderer::traits::{Meshes, Programs, RenderBackend};
use crate::systems::orbit::OrbitAnimator;

/// Lifecycle of the render loop.
/// `Shutdown` is terminal; there are no error states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Init,
    Running,
    Shutdown,
}

/// All mutable per-process state, owned by the render loop.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub timing: FrameTiming,
    pub camera: FlyCamera,
    pub orbit: OrbitAnimator,
    pub viewport: Viewport,
}

impl SceneState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            timing: FrameTiming::default(),
            camera: FlyCamera::new(&config.camera),
            orbit: OrbitAnimator::new(&config.orbit),
            viewport: Viewport::new(config.window.width, config.window.height),
        }
    }

    /// Apply one frame of input. Look and zoom land first, so movement
    /// follows the freshly turned camera. Movement uses this frame's delta.
    pub fn apply_input(&mut self, input: &FrameInput) {
        if let Some(viewport) = input.viewport {
            if viewport != self.viewport {
                log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
            }
            self.viewport = viewport;
        }
        if input.look_delta != Vec2::ZERO {
            self.camera.apply_look(input.look_delta);
        }
        if input.scroll != 0.0 {
            self.camera.apply_zoom(input.scroll);
        }
        for direction in input.movement.directions() {
            self.camera.apply_movement(direction, self.timing.delta_time);
        }
        for _ in 0..input.toggle_presses {
            self.orbit.toggle();
        }
    }
}

/// The interactive viewer: owns the scene state and runs one frame at a time.
///
/// Per frame: Clock → PollInput → Advance → Compose → Render.
/// The host pushes events between frames and calls `frame` once per display
/// refresh with its monotonic time in seconds.
pub struct Viewer {
    state: SceneState,
    clock: Clock,
    queue: InputQueue,
    pending: PendingInput,
    composer: SceneComposer,
    dispatcher: RenderDispatcher,
    loop_state: LoopState,
    frames: u64,
}

impl Viewer {
    /// Build a viewer in `Init`. The config is validated here, so nothing
    /// past construction can fail.
    pub fn new(
        config: &ViewerConfig,
        programs: Programs,
        meshes: Meshes,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let composer = SceneComposer::from_config(&config.orbit);
        let dispatcher = RenderDispatcher::new(
            programs,
            meshes,
            config.uniforms.clone(),
            config.projection.clone(),
            &config.lighting,
            composer.sun_offset(),
        );
        Ok(Self {
            state: SceneState::new(config),
            clock: Clock::new(),
            queue: InputQueue::new(),
            pending: PendingInput::new(config.bindings.clone()),
            composer,
            dispatcher,
            loop_state: LoopState::Init,
            frames: 0,
        })
    }

    /// Bind samplers and enter the loop. No-op unless in `Init`.
    pub fn start(&mut self, backend: &mut impl RenderBackend) {
        if self.loop_state != LoopState::Init {
            return;
        }
        self.dispatcher.bind_samplers(backend);
        self.loop_state = LoopState::Running;
        log::info!(
            "viewer started ({}x{}, orbit {})",
            self.state.viewport.width,
            self.state.viewport.height,
            if self.state.orbit.is_active() { "running" } else { "paused" }
        );
    }

    /// Queue an input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Ask the loop to stop at the next frame.
    pub fn request_close(&mut self) {
        self.queue.push(InputEvent::CloseRequested);
    }

    /// Run one frame at host time `now` (seconds). Returns the loop state
    /// after the frame; frames outside `Running` do nothing.
    pub fn frame(&mut self, now: f32, backend: &mut impl RenderBackend) -> LoopState {
        if self.loop_state != LoopState::Running {
            return self.loop_state;
        }

        self.state.timing = self.clock.tick(now);

        // PollInput
        self.pending.apply_all(self.queue.drain());
        let input = self.pending.take_frame();
        if input.close_requested {
            self.loop_state = LoopState::Shutdown;
            log::info!("viewer shutting down after {} frames", self.frames);
            return self.loop_state;
        }
        self.state.apply_input(&input);

        // Advance
        self.state.orbit.advance(self.state.timing.delta_time);

        // Compose
        let scene = self.composer.compose(self.state.orbit.phase_angle());

        // Render
        self.dispatcher
            .render(backend, &self.state.camera, &scene, self.state.viewport);
        backend.present();

        self.frames += 1;
        log::trace!(
            "frame {} dt={:.4} phase={:.4}",
            self.frames,
            self.state.timing.delta_time,
            self.state.orbit.phase_angle()
        );
        self.loop_state
    }

    /// Matrices for the current state without rendering.
    pub fn compose(&self) -> ComposedScene {
        self.composer.compose(self.state.orbit.phase_angle())
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

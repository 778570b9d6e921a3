use std::collections::HashSet;

use glam::Vec2;

use crate::api::config::KeyBindings;
use crate::api::types::Viewport;
use crate::input::queue::InputEvent;
use crate::renderer::camera::CameraMovement;

/// Movement keys held at the end of the input poll. Level-triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    /// Held directions in a fixed order: forward, backward, left, right.
    pub fn directions(&self) -> impl Iterator<Item = CameraMovement> {
        [
            (self.forward, CameraMovement::Forward),
            (self.backward, CameraMovement::Backward),
            (self.left, CameraMovement::Left),
            (self.right, CameraMovement::Right),
        ]
        .into_iter()
        .filter_map(|(held, dir)| held.then_some(dir))
    }
}

/// Everything the frame loop consumes from one input poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer delta since the last poll: x to the right, y upwards.
    pub look_delta: Vec2,
    /// Summed vertical scroll.
    pub scroll: f32,
    pub movement: MovementKeys,
    /// Press edges of the orbit-toggle key seen since the last poll.
    pub toggle_presses: u32,
    pub close_requested: bool,
    /// Latest surface size, if it changed.
    pub viewport: Option<Viewport>,
}

/// Folds raw input events into per-frame snapshots.
///
/// Events arrive between frames in whatever order the host delivers them.
/// Deltas, scroll and toggle edges are consumed by `take_frame`; held keys
/// and the pointer reference persist across frames.
#[derive(Debug, Clone)]
pub struct PendingInput {
    bindings: KeyBindings,
    held: HashSet<u32>,
    /// Last pointer position. `None` until the first sample after capture.
    last_pointer: Option<Vec2>,
    look_delta: Vec2,
    scroll: f32,
    toggle_presses: u32,
    close_requested: bool,
    viewport: Option<Viewport>,
}

impl PendingInput {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            last_pointer: None,
            look_delta: Vec2::ZERO,
            scroll: 0.0,
            toggle_presses: 0,
            close_requested: false,
            viewport: None,
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                if let Some(last) = self.last_pointer {
                    // Window y grows downwards; look y grows upwards.
                    self.look_delta += Vec2::new(pos.x - last.x, last.y - pos.y);
                }
                self.last_pointer = Some(pos);
            }
            InputEvent::PointerCapture => {
                self.last_pointer = None;
            }
            InputEvent::Scroll { dy, .. } => {
                self.scroll += dy;
            }
            InputEvent::KeyDown { key_code } => {
                let pressed = self.held.insert(key_code);
                if pressed && key_code == self.bindings.toggle_orbit {
                    self.toggle_presses += 1;
                }
                if key_code == self.bindings.quit {
                    self.close_requested = true;
                }
            }
            InputEvent::KeyUp { key_code } => {
                self.held.remove(&key_code);
            }
            InputEvent::Resize { width, height } => {
                self.viewport = Some(Viewport::new(width, height));
            }
            InputEvent::CloseRequested => {
                self.close_requested = true;
            }
        }
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Take the snapshot for this frame and reset the per-frame accumulators.
    pub fn take_frame(&mut self) -> FrameInput {
        let frame = FrameInput {
            look_delta: self.look_delta,
            scroll: self.scroll,
            movement: self.movement(),
            toggle_presses: self.toggle_presses,
            close_requested: self.close_requested,
            viewport: self.viewport.take(),
        };
        self.look_delta = Vec2::ZERO;
        self.scroll = 0.0;
        self.toggle_presses = 0;
        self.close_requested = false;
        frame
    }

    fn movement(&self) -> MovementKeys {
        let b = &self.bindings;
        MovementKeys {
            forward: self.held.contains(&b.forward),
            backward: self.held.contains(&b.backward),
            left: self.held.contains(&b.left),
            right: self.held.contains(&b.right),
        }
    }
}

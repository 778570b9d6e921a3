use planets_engine::{
    CommandBuffer, ConfigError, InputEvent, LoopState, Meshes, Programs, Viewer, ViewerConfig,
};

/// Convert a DOM `wheel` event into one scroll notch.
///
/// DOM deltas grow when scrolling down and their magnitude depends on
/// `deltaMode`; the viewer wants notches with positive meaning "up" (zoom in).
pub fn wheel_event(delta_x: f64, delta_y: f64) -> InputEvent {
    fn notch(delta: f64) -> f32 {
        if delta > 0.0 {
            -1.0
        } else if delta < 0.0 {
            1.0
        } else {
            0.0
        }
    }
    InputEvent::Scroll {
        dx: notch(delta_x),
        dy: notch(delta_y),
    }
}

/// Drives a `Viewer` for a browser host.
///
/// The host loads shaders and meshes itself, assigning the default program
/// and mesh handles, then calls `frame` once per animation frame and replays
/// the recorded command buffer against its WebGL context.
///
/// Sampler bindings are recorded by `new` into a separate init buffer; the
/// host replays that once before the first frame.
pub struct ViewerRunner {
    viewer: Viewer,
    config: ViewerConfig,
    init_commands: CommandBuffer,
    commands: CommandBuffer,
    /// Host time of the first frame in milliseconds. The viewer's clock
    /// starts at zero there.
    time_origin: Option<f64>,
}

impl ViewerRunner {
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        let mut viewer = Viewer::new(&config, Programs::default(), Meshes::default())?;
        let mut init_commands = CommandBuffer::new();
        init_commands.begin_frame();
        viewer.start(&mut init_commands);
        Ok(Self {
            viewer,
            config,
            init_commands,
            commands: CommandBuffer::new(),
            time_origin: None,
        })
    }

    /// Parse a JSON config. An empty string means defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = if json.trim().is_empty() {
            ViewerConfig::default()
        } else {
            ViewerConfig::from_json(json)?
        };
        Self::new(config)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.viewer.push_input(event);
    }

    /// Run one frame at host time `now_ms` (milliseconds, as from
    /// `performance.now()`). Returns false once the loop has shut down.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let origin = *self.time_origin.get_or_insert(now_ms);
        let now = ((now_ms - origin) / 1000.0) as f32;
        self.commands.begin_frame();
        self.viewer.frame(now, &mut self.commands) != LoopState::Shutdown
    }

    pub fn request_close(&mut self) {
        self.viewer.request_close();
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn config_json(&self) -> String {
        self.config.to_json().unwrap_or_else(|err| {
            log::warn!("config serialization failed: {}", err);
            "{}".to_string()
        })
    }

    // ---- Command buffer accessors ----

    pub fn init_commands(&self) -> &[f32] {
        self.init_commands.as_slice()
    }

    pub fn commands(&self) -> &[f32] {
        self.commands.as_slice()
    }

    pub fn commands_ptr(&self) -> *const f32 {
        self.commands.as_ptr()
    }

    pub fn commands_len(&self) -> u32 {
        self.commands.len() as u32
    }

    /// Name table for the init buffer. Each buffer interns its own names.
    pub fn init_uniform_names(&self) -> String {
        self.init_commands.names_json()
    }

    pub fn uniform_names(&self) -> String {
        self.commands.names_json()
    }
}

pub mod runner;

pub use runner::{wheel_event, ViewerRunner};

use std::cell::RefCell;

use planets_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<ViewerRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the viewer, or return `None` before `viewer_init`.
fn with_runner<R>(f: impl FnOnce(&mut ViewerRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn push(event: InputEvent) {
    if with_runner(|r| r.push_input(event)).is_none() {
        log::warn!("input before viewer_init dropped");
    }
}

/// Create the viewer from a JSON config (empty string for defaults).
/// Replaces any previous viewer.
#[wasm_bindgen]
pub fn viewer_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = ViewerRunner::from_json(config_json).map_err(|err| {
        log::error!("planets: {}", err);
        JsValue::from_str(&err.to_string())
    })?;
    let window = &runner.config().window;
    log::info!("planets: initialized '{}' {}x{}", window.title, window.width, window.height);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    Ok(())
}

/// Run one frame at `performance.now()` milliseconds.
/// Returns false once the viewer has shut down (or was never initialized).
#[wasm_bindgen]
pub fn viewer_frame(now_ms: f64) -> bool {
    with_runner(|r| r.frame(now_ms)).unwrap_or(false)
}

// ---- Input ----

#[wasm_bindgen]
pub fn viewer_pointer_move(x: f32, y: f32) {
    push(InputEvent::PointerMove { x, y });
}

/// Pointer lock (re)acquired. The next move becomes the new reference.
#[wasm_bindgen]
pub fn viewer_pointer_capture() {
    push(InputEvent::PointerCapture);
}

/// Raw `WheelEvent.deltaX` / `deltaY`. Positive `deltaY` (scroll down)
/// zooms out; each event counts as one notch.
#[wasm_bindgen]
pub fn viewer_scroll(delta_x: f64, delta_y: f64) {
    push(wheel_event(delta_x, delta_y));
}

#[wasm_bindgen]
pub fn viewer_key_down(key_code: u32) {
    push(InputEvent::KeyDown { key_code });
}

#[wasm_bindgen]
pub fn viewer_key_up(key_code: u32) {
    push(InputEvent::KeyUp { key_code });
}

#[wasm_bindgen]
pub fn viewer_resize(width: u32, height: u32) {
    push(InputEvent::Resize { width, height });
}

#[wasm_bindgen]
pub fn viewer_close() {
    with_runner(|r| r.request_close());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_commands_ptr() -> *const f32 {
    with_runner(|r| r.commands_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_commands_len() -> u32 {
    with_runner(|r| r.commands_len()).unwrap_or(0)
}

/// Copy of this frame's command buffer.
#[wasm_bindgen]
pub fn get_commands() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.commands()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

/// Sampler bindings to replay once before the first frame.
#[wasm_bindgen]
pub fn get_init_commands() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.init_commands()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_uniform_names() -> String {
    with_runner(|r| r.uniform_names()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn get_init_uniform_names() -> String {
    with_runner(|r| r.init_uniform_names()).unwrap_or_else(|| "[]".to_string())
}

/// Effective config, including defaults, for the host's asset loader.
#[wasm_bindgen]
pub fn get_config_json() -> String {
    with_runner(|r| r.config_json()).unwrap_or_else(|| "{}".to_string())
}

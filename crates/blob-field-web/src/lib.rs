//! Browser host for `blob-field`: mounts the animation on a `<canvas>` and
//! drives it from `requestAnimationFrame`.
//!
//! wasm-bindgen cannot export generic structs, so the single running
//! `FieldRunner` lives in a `thread_local!` and is reached through free
//! functions.

pub mod canvas;
pub mod runner;

use std::cell::RefCell;

use blob_field::{FieldConfig, FieldError, FieldMode};
use wasm_bindgen::prelude::*;

pub use canvas::CanvasSurface;
pub use runner::FieldRunner;

thread_local! {
    static RUNNER: RefCell<Option<FieldRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut FieldRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn to_js(err: FieldError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Resolve a mode name to a starting config. `"auto"` picks from the
/// viewport width and asks for breakpoint tracking.
pub fn resolve_mode(mode: &str, viewport_width: f32) -> Result<(FieldConfig, bool), FieldError> {
    if mode == "auto" {
        return Ok((FieldMode::for_viewport_width(viewport_width).config(), true));
    }
    FieldMode::from_name(mode)
        .map(|m| (m.config(), false))
        .ok_or_else(|| FieldError::InvalidConfig(format!("unknown mode '{}'", mode)))
}

fn init_host() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn mount(canvas_id: &str, config: FieldConfig, responsive: bool) -> Result<(), FieldError> {
    // Replacing a running field tears the old one down first
    field_unmount();
    let surface = CanvasSurface::from_element_id(canvas_id)?;
    let runner = FieldRunner::start(surface, config, responsive)?;
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    log::info!("blob field mounted on #{}", canvas_id);
    Ok(())
}

/// Mount on the canvas with id `canvas_id`. `mode` is `"full"`,
/// `"constrained"` or `"auto"`.
#[wasm_bindgen]
pub fn field_mount(canvas_id: &str, mode: &str) -> Result<(), JsValue> {
    init_host();
    let width = web_sys::window()
        .and_then(|w| runner::viewport_size(&w))
        .map_or(0.0, |(w, _)| w);
    let (config, responsive) = resolve_mode(mode, width).map_err(to_js)?;
    mount(canvas_id, config, responsive).map_err(to_js)
}

/// Mount with an explicit JSON config:
/// `{"blobCount": 4, "updateSpeedFactor": 0.12, "palette": [{"r":..,"g":..,"b":..}]}`.
#[wasm_bindgen]
pub fn field_mount_with_config(canvas_id: &str, config_json: &str) -> Result<(), JsValue> {
    init_host();
    let config = FieldConfig::from_json(config_json).map_err(to_js)?;
    mount(canvas_id, config, false).map_err(to_js)
}

/// Stop the animation and release the canvas listeners. No-op when nothing
/// is mounted.
#[wasm_bindgen]
pub fn field_unmount() {
    let runner = RUNNER.with(|cell| cell.borrow_mut().take());
    if let Some(mut runner) = runner {
        runner.stop();
    }
}

#[wasm_bindgen]
pub fn field_is_running() -> bool {
    with_runner(|r| r.is_running()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_modes_are_fixed() {
        let (config, responsive) = resolve_mode("full", 320.0).unwrap();
        assert_eq!(config, FieldMode::Full.config());
        assert!(!responsive);

        let (config, responsive) = resolve_mode("constrained", 1920.0).unwrap();
        assert_eq!(config, FieldMode::Constrained.config());
        assert!(!responsive);
    }

    #[test]
    fn auto_follows_viewport() {
        let (config, responsive) = resolve_mode("auto", 500.0).unwrap();
        assert_eq!(config.blob_count, 3);
        assert!(responsive);

        let (config, _) = resolve_mode("auto", 1440.0).unwrap();
        assert_eq!(config.blob_count, 5);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(matches!(
            resolve_mode("huge", 1024.0),
            Err(FieldError::InvalidConfig(_))
        ));
    }
}

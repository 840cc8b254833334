use std::cell::{Cell, RefCell};
use std::rc::Rc;

use blob_field::{FieldConfig, FieldError, FieldMode, InputEvent, Scene};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::canvas::CanvasSurface;

type FrameCallback = Closure<dyn FnMut(f64)>;

fn js_error(what: &str, err: JsValue) -> FieldError {
    FieldError::SurfaceUnavailable(format!("{}: {:?}", what, err))
}

/// Current viewport size in CSS pixels, if the window reports one.
pub(crate) fn viewport_size(window: &Window) -> Option<(f32, f32)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

/// The mode to switch to after the viewport became `width` wide, or `None`
/// when `current` still applies.
pub fn next_mode(current: FieldMode, width: f32) -> Option<FieldMode> {
    let wanted = FieldMode::for_viewport_width(width);
    (wanted != current).then_some(wanted)
}

/// A DOM listener that stays registered for as long as it is held.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, FieldError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| js_error(kind, e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Drives a `Scene` from `requestAnimationFrame` and feeds it window events.
///
/// The frame closure re-schedules itself through a shared slot, which forms
/// a reference cycle. `stop` (or dropping the runner) cancels the pending
/// frame and empties the slot so the closure and the scene are released.
pub struct FieldRunner {
    window: Window,
    scene: Rc<RefCell<Scene<CanvasSurface>>>,
    frame_callback: Rc<RefCell<Option<FrameCallback>>>,
    frame_id: Rc<Cell<Option<i32>>>,
    listeners: Vec<Listener>,
}

impl FieldRunner {
    /// Size the canvas to the viewport, build the scene and start animating.
    ///
    /// With `responsive` set, the scene is reconfigured whenever a resize
    /// crosses the constrained-mode breakpoint.
    pub fn start(
        mut surface: CanvasSurface,
        config: FieldConfig,
        responsive: bool,
    ) -> Result<Self, FieldError> {
        let window =
            web_sys::window().ok_or_else(|| FieldError::SurfaceUnavailable("no window".into()))?;
        if let Some((width, height)) = viewport_size(&window) {
            blob_field::Surface::resize(&mut surface, width, height);
        }
        let canvas = surface.canvas().clone();

        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let scene = Rc::new(RefCell::new(Scene::new(config, surface, now)?));

        let mut runner = Self {
            window: window.clone(),
            scene,
            frame_callback: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            listeners: Vec::new(),
        };

        if let Err(err) = runner.attach_listeners(&canvas, responsive) {
            runner.stop();
            return Err(err);
        }
        runner.install_frame_callback();
        if let Err(err) = runner.schedule_first_frame() {
            runner.stop();
            return Err(err);
        }
        Ok(runner)
    }

    fn attach_listeners(
        &mut self,
        canvas: &HtmlCanvasElement,
        responsive: bool,
    ) -> Result<(), FieldError> {
        let window_target: &EventTarget = &self.window;

        let mode = Cell::new(FieldMode::for_viewport_width(self.scene.borrow().bounds().x));
        let scene = self.scene.clone();
        let window = self.window.clone();
        self.listeners.push(Listener::attach(window_target, "resize", move |_| {
            let Some((width, height)) = viewport_size(&window) else {
                return;
            };
            let mut scene = scene.borrow_mut();
            scene.resize(width, height);
            if !responsive {
                return;
            }
            if let Some(next) = next_mode(mode.get(), width) {
                let config = next.config().with_palette(&scene.config().palette);
                match scene.reconfigure(config) {
                    Ok(()) => mode.set(next),
                    Err(err) => log::warn!("keeping {:?} mode: {}", mode.get(), err),
                }
            }
        })?);

        let scene = self.scene.clone();
        let canvas = canvas.clone();
        self.listeners.push(Listener::attach(window_target, "pointermove", move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = canvas.get_bounding_client_rect();
            scene.borrow_mut().push_input(InputEvent::PointerMove {
                x: (mouse.client_x() as f64 - rect.left()) as f32,
                y: (mouse.client_y() as f64 - rect.top()) as f32,
                time_ms: event.time_stamp(),
            });
        })?);

        let scene = self.scene.clone();
        self.listeners.push(Listener::attach(window_target, "blur", move |_| {
            scene.borrow_mut().push_input(InputEvent::PointerLeave);
        })?);

        if let Some(root) = self.window.document().and_then(|d| d.document_element()) {
            let scene = self.scene.clone();
            self.listeners.push(Listener::attach(&root, "pointerleave", move |_| {
                scene.borrow_mut().push_input(InputEvent::PointerLeave);
            })?);
        }
        Ok(())
    }

    fn install_frame_callback(&mut self) {
        let slot = self.frame_callback.clone();
        let scene = self.scene.clone();
        let frame_id = self.frame_id.clone();
        let window = self.window.clone();

        let callback = Closure::wrap(Box::new(move |now: f64| {
            frame_id.set(None);
            if scene.borrow_mut().frame(now).is_none() {
                return;
            }
            if let Some(callback) = slot.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => frame_id.set(Some(id)),
                    Err(err) => log::error!("failed to schedule next frame: {:?}", err),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        *self.frame_callback.borrow_mut() = Some(callback);
    }

    fn schedule_first_frame(&self) -> Result<(), FieldError> {
        let slot = self.frame_callback.borrow();
        let Some(callback) = slot.as_ref() else {
            return Err(FieldError::SurfaceUnavailable("frame callback missing".into()));
        };
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| js_error("requestAnimationFrame", e))?;
        self.frame_id.set(Some(id));
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.scene.borrow().is_running()
    }

    /// Stop animating, cancel any pending frame and detach every listener.
    /// Calling it again is harmless.
    pub fn stop(&mut self) {
        self.scene.borrow_mut().stop();
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.frame_callback.borrow_mut().take();
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
    }
}

impl Drop for FieldRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_the_breakpoint_switches_mode() {
        assert_eq!(next_mode(FieldMode::Full, 600.0), Some(FieldMode::Constrained));
        assert_eq!(next_mode(FieldMode::Constrained, 1280.0), Some(FieldMode::Full));
    }

    #[test]
    fn staying_on_one_side_keeps_mode() {
        assert_eq!(next_mode(FieldMode::Full, 1024.0), None);
        assert_eq!(next_mode(FieldMode::Constrained, 768.0), None);
        assert_eq!(next_mode(FieldMode::Constrained, 320.0), None);
    }
}

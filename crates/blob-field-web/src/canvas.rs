//! `Surface` implementation over a browser 2D canvas.

use blob_field::{BlobPath, FieldError, PathCommand, RadialGradient, Rgba, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn unavailable(what: &str, err: JsValue) -> FieldError {
    FieldError::SurfaceUnavailable(format!("{}: {:?}", what, err))
}

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, FieldError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| unavailable("getContext('2d') threw", e))?
            .ok_or_else(|| FieldError::SurfaceUnavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| unavailable("context is not a CanvasRenderingContext2d", e.into()))?;
        Ok(Self { canvas, ctx })
    }

    /// Look up a canvas by element id.
    pub fn from_element_id(id: &str) -> Result<Self, FieldError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| FieldError::SurfaceUnavailable("no document".into()))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| FieldError::SurfaceUnavailable(format!("no element with id '{}'", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|e| unavailable(&format!("#{} is not a canvas", id), e.into()))?;
        Self::new(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn resize(&mut self, width: f32, height: f32) {
        // Assigning the size clears the canvas, so only do it on a real change
        let (w, h) = (width.max(0.0) as u32, height.max(0.0) as u32);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_path(&mut self, path: &BlobPath, paint: &RadialGradient) -> Result<(), FieldError> {
        self.ctx.begin_path();
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(p) => self.ctx.move_to(p.x as f64, p.y as f64),
                PathCommand::CubicTo { ctrl1, ctrl2, to } => self.ctx.bezier_curve_to(
                    ctrl1.x as f64,
                    ctrl1.y as f64,
                    ctrl2.x as f64,
                    ctrl2.y as f64,
                    to.x as f64,
                    to.y as f64,
                ),
                PathCommand::Close => self.ctx.close_path(),
            }
        }

        let (cx, cy) = (paint.center.x as f64, paint.center.y as f64);
        let gradient = self
            .ctx
            .create_radial_gradient(cx, cy, 0.0, cx, cy, paint.radius.max(0.0) as f64)
            .map_err(|e| FieldError::Draw(format!("createRadialGradient: {:?}", e)))?;
        for stop in paint.stops() {
            gradient
                .add_color_stop(stop.offset, &stop.color.to_css())
                .map_err(|e| FieldError::Draw(format!("addColorStop: {:?}", e)))?;
        }

        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill();
        Ok(())
    }
}

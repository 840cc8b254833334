//! Drawing-surface contract.
//!
//! The field never talks to a concrete canvas. Hosts implement [`Surface`]
//! over whatever they draw on: a browser `CanvasRenderingContext2d`, a
//! tessellated vertex buffer (see `systems::vector`), or a recorder for tests.
//!
//! Fills composite over existing content. The trail effect depends on a
//! partially transparent `fill_rect` leaving most of the previous frame intact.

use glam::Vec2;

use crate::api::error::FieldError;
use crate::components::palette::Rgb;

/// RGB colour with a straight (non-premultiplied) alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Build a colour from `rgb` at `alpha`, clamped to [0, 1].
    pub fn from_rgb(rgb: Rgb, alpha: f32) -> Self {
        Self {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            a: if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) },
        }
    }

    /// CSS colour string, e.g. `rgba(255, 0, 0, 0.27)`.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Channels as floats in [0, 1].
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }
}

/// One stop of a gradient. `offset` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Radial gradient from `center` (offset 0) out to `radius` (offset 1).
/// Stops are kept sorted by offset.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            stops: Vec::with_capacity(3),
        }
    }

    /// Add a stop. Offsets outside [0, 1] are clamped.
    pub fn with_stop(mut self, offset: f32, color: Rgba) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let idx = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(idx, ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Colour at `point`, interpolated linearly between neighbouring stops.
    /// Points past the outer radius take the last stop's colour.
    pub fn color_at(&self, point: Vec2) -> Rgba {
        let t = if self.radius > 0.0 {
            (point.distance(self.center) / self.radius).min(1.0)
        } else {
            1.0
        };
        self.color_at_offset(t)
    }

    pub fn color_at_offset(&self, t: f32) -> Rgba {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Rgba::from_rgb(Rgb::new(0, 0, 0), 0.0),
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * k).round() as u8;
                return Rgba {
                    r: mix(a.color.r, b.color.r),
                    g: mix(a.color.g, b.color.g),
                    b: mix(a.color.b, b.color.b),
                    a: a.color.a + (b.color.a - a.color.a) * k,
                };
            }
        }
        last.color
    }
}

/// A path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

/// A closed outline built from path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlobPath {
    commands: Vec<PathCommand>,
}

impl BlobPath {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn cubic_to(&mut self, ctrl1: Vec2, ctrl2: Vec2, to: Vec2) {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A 2D drawing target with a fixed pixel size.
pub trait Surface {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    /// Called when the host's drawing area changes size.
    fn resize(&mut self, width: f32, height: f32);

    /// Composite a solid rectangle over the current content.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);

    /// Fill a closed path with a radial gradient.
    fn fill_path(&mut self, path: &BlobPath, paint: &RadialGradient) -> Result<(), FieldError>;
}

//! Lyon-based tessellating surface.
//!
//! Turns blob outlines and fade rectangles into a flat triangle-list vertex
//! buffer for GPU hosts. Each fill also records a [`FillBatch`] with its
//! vertex range and gradient, so a shader can evaluate the radial gradient per
//! pixel. Vertex colours hold the gradient sampled at each vertex as a
//! fallback for hosts that only do per-vertex colour.
//!
//! The buffer accumulates until the host calls [`VectorState::clear`], usually
//! right after uploading a frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::{point, Box2D, Point};
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, VertexBuffers,
};

use crate::api::error::FieldError;
use crate::renderer::surface::{BlobPath, PathCommand, RadialGradient, Rgba, Surface};

/// Per-vertex data for vector rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4; // 24

    fn at(position: Point, color: Rgba) -> Self {
        let [r, g, b, a] = color.to_f32();
        Self {
            x: position.x,
            y: position.y,
            r,
            g,
            b,
            a,
        }
    }
}

/// A contiguous run of vertices produced by one fill.
#[derive(Debug, Clone, PartialEq)]
pub struct FillBatch {
    /// First vertex index.
    pub start: u32,
    /// End vertex index (exclusive).
    pub end: u32,
    /// Gradient for path fills; `None` for solid rectangles.
    pub paint: Option<RadialGradient>,
}

struct SolidVertexCtor {
    color: Rgba,
}

impl FillVertexConstructor<VectorVertex> for SolidVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

struct GradientVertexCtor<'a> {
    paint: &'a RadialGradient,
}

impl FillVertexConstructor<VectorVertex> for GradientVertexCtor<'_> {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(p, self.paint.color_at(Vec2::new(p.x, p.y)))
    }
}

/// Convert a blob outline to a lyon path.
pub fn to_lyon_path(path: &BlobPath) -> Path {
    let to_point = |v: Vec2| point(v.x, v.y);
    let mut builder = Path::builder();
    let mut open = false;

    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(p) => {
                if open {
                    builder.end(false);
                }
                builder.begin(to_point(p));
                open = true;
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } if open => {
                builder.cubic_bezier_to(to_point(ctrl1), to_point(ctrl2), to_point(to));
            }
            PathCommand::CubicTo { .. } => {}
            PathCommand::Close => {
                if open {
                    builder.close();
                    open = false;
                }
            }
        }
    }
    if open {
        builder.end(false);
    }
    builder.build()
}

/// Tessellating [`Surface`] backed by lyon.
pub struct VectorState {
    fill_tess: FillTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    batches: Vec<FillBatch>,
    width: f32,
    height: f32,
}

impl VectorState {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(4096 * VectorVertex::FLOATS),
            batches: Vec::with_capacity(8),
            width,
            height,
        }
    }

    /// Clear the vertex buffer and batches.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.batches.clear();
    }

    /// Number of vertices currently in the buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Flat float buffer, `VectorVertex::FLOATS` per vertex.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Raw pointer to the flat float buffer (for shared-memory reads).
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn batches(&self) -> &[FillBatch] {
        &self.batches
    }

    /// Flush indexed geometry to the flat buffer as a triangle list and
    /// record the batch.
    fn flush_geometry(&mut self, paint: Option<RadialGradient>) {
        let start = self.vertex_count() as u32;
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(v)));
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();

        let end = self.vertex_count() as u32;
        if end > start {
            self.batches.push(FillBatch { start, end, paint });
        }
    }
}

impl Surface for VectorState {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let mut builder = Path::builder();
        builder.add_rectangle(
            &Box2D::new(point(x, y), point(x + width, y + height)),
            Winding::Positive,
        );
        let path = builder.build();

        let result = self.fill_tess.tessellate_path(
            &path,
            &FillOptions::tolerance(0.5),
            &mut BuffersBuilder::new(&mut self.geometry, SolidVertexCtor { color }),
        );

        if result.is_ok() {
            self.flush_geometry(None);
        }
    }

    fn fill_path(&mut self, path: &BlobPath, paint: &RadialGradient) -> Result<(), FieldError> {
        let path = to_lyon_path(path);
        let result = self.fill_tess.tessellate_path(
            &path,
            &FillOptions::tolerance(0.5),
            &mut BuffersBuilder::new(&mut self.geometry, GradientVertexCtor { paint }),
        );

        match result {
            Ok(()) => {
                self.flush_geometry(Some(paint.clone()));
                Ok(())
            }
            Err(err) => {
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
                Err(FieldError::Draw(format!("tessellation failed: {:?}", err)))
            }
        }
    }
}

//! A surface that records draw calls instead of rasterizing them.
//! Used by headless hosts and by tests that inspect what a frame drew.

use super::surface::{BlobPath, RadialGradient, Rgba, Surface};
use crate::api::error::FieldError;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
    },
    FillPath {
        path: BlobPath,
        paint: RadialGradient,
    },
}

/// Records every call made against it.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    /// Reject every path fill. Lets tests exercise the skip-on-failure path.
    fail_paths: bool,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(16),
            fail_paths: false,
        }
    }

    /// A recorder whose `fill_path` always fails.
    pub fn failing(width: f32, height: f32) -> Self {
        Self {
            fail_paths: true,
            ..Self::new(width, height)
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded path fills, in draw order.
    pub fn paths(&self) -> impl Iterator<Item = (&BlobPath, &RadialGradient)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillPath { path, paint } => Some((path, paint)),
            _ => None,
        })
    }

    /// Total number of path commands across all recorded fills.
    pub fn path_command_count(&self) -> usize {
        self.paths().map(|(p, _)| p.len()).sum()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
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
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_path(&mut self, path: &BlobPath, paint: &RadialGradient) -> Result<(), FieldError> {
        if self.fail_paths {
            return Err(FieldError::Draw("recording surface set to fail".into()));
        }
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
        Ok(())
    }
}

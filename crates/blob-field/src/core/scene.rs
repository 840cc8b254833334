//! The blob field: owns the blobs and the surface they draw on, and runs one
//! frame of the animation per `frame` call.

use glam::Vec2;

use crate::api::config::FieldConfig;
use crate::api::error::FieldError;
use crate::components::blob::{Blob, DEFAULT_POINTER_RADIUS};
use crate::components::palette::Rgb;
use crate::core::rng::Rng;
use crate::core::time::FrameClock;
use crate::input::pointer::PointerTracker;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::surface::{Rgba, Surface};

/// Colour of the per-frame fade. At this alpha previous frames linger for
/// hundreds of frames, leaving long soft trails.
const TRAIL_COLOR: Rgb = Rgb::WHITE;
const TRAIL_ALPHA: f32 = 0.005;

const BASE_ALPHA: f32 = 0.3;
const ALPHA_STEP: f32 = 0.03;

const MIN_RADIUS: f32 = 100.0;
const MAX_RADIUS: f32 = 250.0;

/// Opacity for the blob at draw index `index`. Later blobs are fainter.
pub fn layer_alpha(index: usize) -> f32 {
    BASE_ALPHA - index as f32 * ALPHA_STEP
}

/// What one frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Clamped frame delta (ms).
    pub dt: f32,
    /// Delta handed to each blob update, after the speed factor.
    pub blob_dt: f32,
    pub drawn: usize,
    /// Blobs whose fill failed this frame.
    pub skipped: usize,
}

/// A running blob field over surface `S`.
pub struct Scene<S: Surface> {
    blobs: Vec<Blob>,
    surface: S,
    bounds: Vec2,
    clock: FrameClock,
    config: FieldConfig,
    rng: Rng,
    input: InputQueue,
    pointer: PointerTracker,
    running: bool,
}

impl<S: Surface> Scene<S> {
    /// Create a field seeded from `now_ms`.
    pub fn new(config: FieldConfig, surface: S, now_ms: f64) -> Result<Self, FieldError> {
        Self::with_rng(config, surface, now_ms, Rng::from_time(now_ms))
    }

    /// Create a field drawing all randomness from `rng`.
    pub fn with_rng(
        config: FieldConfig,
        surface: S,
        now_ms: f64,
        mut rng: Rng,
    ) -> Result<Self, FieldError> {
        config.validate()?;
        let bounds = usable_bounds(surface.width(), surface.height())?;
        let blobs = spawn_blobs(&config, bounds, &mut rng);

        log::info!(
            "blob field: {} blobs on {}x{} surface",
            blobs.len(),
            bounds.x,
            bounds.y
        );

        Ok(Self {
            blobs,
            surface,
            bounds,
            clock: FrameClock::new(now_ms),
            config,
            rng,
            input: InputQueue::new(),
            pointer: PointerTracker::new(),
            running: true,
        })
    }

    /// Run one frame at host time `now_ms`. Returns `None` once stopped.
    pub fn frame(&mut self, now_ms: f64) -> Option<FrameStats> {
        if !self.running {
            return None;
        }

        let dt = self.clock.advance(now_ms);
        self.apply_input();

        self.surface.fill_rect(
            0.0,
            0.0,
            self.bounds.x,
            self.bounds.y,
            Rgba::from_rgb(TRAIL_COLOR, TRAIL_ALPHA),
        );

        let blob_dt = dt * self.config.update_speed_factor;
        let pointer = self.pointer.sample(now_ms);
        let mut stats = FrameStats {
            dt,
            blob_dt,
            ..FrameStats::default()
        };

        for (i, blob) in self.blobs.iter_mut().enumerate() {
            if let Some(pointer) = &pointer {
                blob.apply_pointer_influence(pointer, DEFAULT_POINTER_RADIUS);
            }
            blob.update(blob_dt, now_ms, self.bounds, &mut self.rng);

            match blob.draw(&mut self.surface, layer_alpha(i)) {
                Ok(()) => stats.drawn += 1,
                Err(err) => {
                    log::warn!("blob {} skipped this frame: {}", i, err);
                    stats.skipped += 1;
                }
            }
        }

        log::trace!("frame dt={} drawn={} skipped={}", dt, stats.drawn, stats.skipped);
        Some(stats)
    }

    fn apply_input(&mut self) {
        for event in self.input.drain() {
            match event {
                InputEvent::PointerMove { x, y, time_ms } => self.pointer.record(x, y, time_ms),
                InputEvent::PointerLeave => self.pointer.leave(),
                InputEvent::Resize { width, height } => self.resize(width, height),
            }
        }
    }

    /// Queue a host event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Adopt a new surface size. Blobs are left where they are and drift back
    /// inside the new bounds through the edge bounce. Sizes with no drawable
    /// area (a minimised window) are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if let Err(err) = usable_bounds(width, height) {
            log::debug!("ignoring resize: {}", err);
            return;
        }
        log::debug!("blob field resized to {}x{}", width, height);
        self.bounds = Vec2::new(width, height);
        self.surface.resize(width, height);
    }

    /// Replace the config and recreate every blob from scratch.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<(), FieldError> {
        config.validate()?;
        self.blobs = spawn_blobs(&config, self.bounds, &mut self.rng);
        log::info!("blob field reconfigured: {} blobs", self.blobs.len());
        self.config = config;
        Ok(())
    }

    /// Stop for good. Later `frame` calls do nothing.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("blob field stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Blobs in draw order.
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

fn usable_bounds(width: f32, height: f32) -> Result<Vec2, FieldError> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(FieldError::SurfaceUnavailable(format!(
            "surface has no drawable area ({}x{})",
            width, height
        )));
    }
    Ok(Vec2::new(width, height))
}

fn spawn_blobs(config: &FieldConfig, bounds: Vec2, rng: &mut Rng) -> Vec<Blob> {
    (0..config.blob_count)
        .map(|i| {
            let color = config.palette[i % config.palette.len()];
            let radius = rng.range(MIN_RADIUS, MAX_RADIUS);
            let x = rng.next_f32() * bounds.x;
            let y = rng.next_f32() * bounds.y;
            Blob::new(x, y, radius, color, rng)
        })
        .collect()
}

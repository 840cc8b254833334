//! Organic "fluid blob" background animation.
//!
//! A [`Scene`] owns a handful of soft [`Blob`]s and a drawing [`Surface`].
//! The host calls [`Scene::frame`] once per display refresh with a monotonic
//! timestamp; each frame fades the surface slightly, steps every blob's
//! spring dynamics and fills its outline with a radial gradient.
//!
//! ```ignore
//! let surface = RecordingSurface::new(1280.0, 720.0);
//! let mut scene = Scene::new(FieldMode::Full.config(), surface, now_ms)?;
//! // every animation frame:
//! scene.frame(now_ms);
//! ```

pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{FieldConfig, FieldMode, CONSTRAINED_BREAKPOINT_PX, MAX_UPDATE_SPEED_FACTOR};
pub use api::error::FieldError;
pub use components::blob::{pointer_falloff, Blob, BoundaryPoint, DEFAULT_POINTER_RADIUS};
pub use components::palette::{Palette, Rgb};
pub use crate::core::rng::Rng;
pub use crate::core::scene::{layer_alpha, FrameStats, Scene};
pub use crate::core::time::{FrameClock, MAX_FRAME_DT_MS};
pub use input::pointer::{PointerSample, PointerTracker, POINTER_IDLE_MS};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::recording::{DrawCommand, RecordingSurface};
pub use renderer::surface::{BlobPath, ColorStop, PathCommand, RadialGradient, Rgba, Surface};

#[cfg(feature = "vectors")]
pub use systems::vector::{FillBatch, VectorState, VectorVertex};

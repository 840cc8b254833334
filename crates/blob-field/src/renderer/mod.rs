pub mod recording;
pub mod surface;

// Re-export key types for convenient access
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{BlobPath, ColorStop, PathCommand, RadialGradient, Rgba, Surface};

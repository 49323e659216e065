//! Nimbus Render
//!
//! The tab session is agnostic to what actually paints pixels. This crate
//! defines the two-entry-point surface contract every backend satisfies,
//! ships an in-memory surface and an out-of-process viewer, and owns the
//! enhancement pipeline that rewrites HTML before display.

mod css;
mod enhance;
mod error;
mod surface;

pub use enhance::{EnhancementPipeline, RenderOutcome};
pub use error::RenderError;
pub use surface::{ExternalViewerSurface, HeadlessSurface, RenderSurface, SurfaceLoad};

pub type Result<T> = std::result::Result<T, RenderError>;

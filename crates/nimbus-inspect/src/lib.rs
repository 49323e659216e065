//! Nimbus Inspect
//!
//! Developer-facing structural summaries of page scripts and stylesheets,
//! for the code-inspection panel. Nothing on the navigation path depends on
//! this crate. The analyzers are deliberately shallow: they answer "what
//! does this file import, declare, and style" without attempting full
//! grammar coverage.

pub mod css;
pub mod js;

mod error;

pub use error::InspectError;

pub type Result<T> = std::result::Result<T, InspectError>;

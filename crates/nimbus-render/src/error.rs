//! Render error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

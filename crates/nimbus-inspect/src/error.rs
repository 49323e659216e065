//! Inspection error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl InspectError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        InspectError::Syntax {
            line,
            message: message.into(),
        }
    }
}

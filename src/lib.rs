pub mod core;
pub mod interact;
pub mod options;
pub mod painter;
pub mod render;
pub mod scale;
pub mod stats;
pub mod style;

use std::fmt;

/// Error context for a failed paint step. Detail travels as `error_stack`
/// attachments; a failed draw call never takes down sibling painters in the
/// same overlay group.
#[derive(Debug)]
pub struct PaintError;

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaintError")
    }
}

impl std::error::Error for PaintError {}

pub type Result<T> = std::result::Result<T, error_stack::Report<PaintError>>;

pub mod prelude {
    pub use crate::core::*;
    pub use crate::interact::*;
    pub use crate::options::*;
    pub use crate::painter::*;
    pub use crate::render::*;
    pub use crate::scale::*;
    pub use crate::stats::*;
    pub use crate::style::*;
}

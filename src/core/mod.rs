/*!
# Core Module

Error taxonomy, source positions and file helpers shared by every layer.
*/

pub mod errors;
pub mod position;
pub mod fs_utils;

pub use errors::{ConsolidationError, Result};
pub use position::{LineIndex, PackedSpan, Position, Span};
pub use fs_utils::read_source_file;

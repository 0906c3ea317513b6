//! # Models Module
//!
//! The staged command text and the document it is written into.

pub mod command_buffer;
pub mod document;

pub use command_buffer::{is_line_break, strip_line_breaks, CommandBuffer};
pub use document::{LineEnding, TargetDocument, TextDocument};

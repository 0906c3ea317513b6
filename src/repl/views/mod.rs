//! # Views Module
//!
//! View components for rendering the terminal interface.

pub mod terminal_renderer;

pub use terminal_renderer::{Screen, TerminalRenderer, ViewRenderer};

//! # Typewriter REPL
//!
//! A one-line command editor feeding a multi-line document, split the usual
//! MVVM way:
//!
//! - **Models**: the staged [`CommandBuffer`](models::CommandBuffer) and the
//!   [`TargetDocument`](models::TargetDocument) it is appended to
//! - **Typewriter**: the bridge between the line editor and the document
//! - **Views**: terminal rendering of document and command line
//! - **Controller**: event loop, persistence

pub mod controllers;
pub mod editor;
pub mod geometry;
pub mod io;
pub mod models;
pub mod typewriter;
pub mod views;

pub use controllers::AppController;
pub use editor::{LineEditor, LineEditorEvent, LineEditorOptions};
pub use geometry::{Position, Range};
pub use models::{CommandBuffer, LineEnding, TargetDocument, TextDocument};
pub use typewriter::{CursorPlacement, SubmitOutcome, Typewriter, TypewriterOptions};
pub use views::{TerminalRenderer, ViewRenderer};

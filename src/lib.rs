//! # Typewriter - Command Line Input for Proof Documents
//!
//! A single-line command editor that appends each submitted command to the
//! end of a multi-line document, one line at a time.
//!
//! ```text
//! ┌──────────────┐  ContentChanged   ┌──────────────┐  replace_range  ┌──────────────┐
//! │  LineEditor  │──────────────────▶│  Typewriter  │────────────────▶│TargetDocument│
//! │              │  KeyUp(Enter)     │              │  set_cursor     │              │
//! │ - value      │                   │ - buffer     │                 │ - lines      │
//! │ - cursor     │◀──────────────────│ - busy flag  │                 │ - cursor     │
//! └──────────────┘  set_value        └──────────────┘                 └──────────────┘
//!                                           ▲
//!                                           │ key / paste / execute
//!                                    ┌──────────────┐
//!                                    │AppController │
//!                                    └──────────────┘
//! ```
//!
//! ```
//! use typewriter::{TargetDocument, TextDocument, Typewriter, TypewriterOptions};
//!
//! let mut document = TextDocument::from_text("theorem foo := by\n");
//! let mut typewriter = Typewriter::mount(TypewriterOptions::default());
//!
//! typewriter.paste("exact rfl", &mut document).unwrap();
//! typewriter.submit(&mut document).unwrap();
//!
//! assert_eq!(document.text(), "theorem foo := by\nexact rfl\n");
//! ```

pub mod cmd_args;
pub mod config;
pub mod logging;
pub mod repl;

pub use repl::*;

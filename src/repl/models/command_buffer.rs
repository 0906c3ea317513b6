//! # Command Buffer
//!
//! The single line of text staged in the typewriter, pending submission.
//! A `CommandBuffer` can never hold a line break.

use std::fmt;

/// Returns true for the characters the command line refuses to hold
pub fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Remove every `\n` and `\r` from `value`
pub fn strip_line_breaks(value: &str) -> String {
    value.chars().filter(|ch| !is_line_break(*ch)).collect()
}

/// Staged single-line command text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBuffer {
    text: String,
}

impl CommandBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from raw editor content, dropping line breaks
    pub fn from_raw(raw: &str) -> Self {
        Self {
            text: strip_line_breaks(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Text that gets written into the document on submission:
    /// the trimmed command followed by a line terminator
    pub fn to_submission(&self) -> String {
        let mut line = self.text.trim().to_string();
        line.push('\n');
        line
    }
}

impl fmt::Display for CommandBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

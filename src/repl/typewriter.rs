//! # Typewriter
//!
//! Bridges a one-line command editor to a multi-line target document.
//! Text typed into the [`LineEditor`] is kept on a single line; submitting it
//! (Enter key-up, or an explicit execute request) appends the trimmed command
//! and a line terminator to the end of the document.
//!
//! The typewriter owns its line editor for as long as it is mounted and
//! drops it on unmount. It never owns the document: every operation that
//! touches it takes a `&mut impl TargetDocument`.

use crate::repl::editor::{LineEditor, LineEditorEvent, LineEditorOptions};
use crate::repl::geometry::{Position, Range};
use crate::repl::models::{CommandBuffer, TargetDocument};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Edit source reported to the document for every insertion
pub const EDIT_SOURCE: &str = "typewriter";

/// Where the document cursor goes after a command is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPlacement {
    /// Back to the insertion point, in front of the new command
    #[default]
    InsertionPoint,
    /// Just past the inserted command and its line terminator
    AfterInsertedText,
}

/// Mount-time configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypewriterOptions {
    pub editor: LineEditorOptions,
    pub cursor_placement: CursorPlacement,
    pub disabled: bool,
}

/// Result of a submission request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The command was written into the document
    Inserted {
        /// End of the document before the insertion
        at: Position,
        /// Range now covered by the inserted text
        range: Range,
        text: String,
    },
    /// Nothing staged, document untouched
    Empty,
    /// A previous submission has not been finished yet
    Busy,
    /// The typewriter is disabled
    Disabled,
}

/// The command input bridge
#[derive(Debug)]
pub struct Typewriter {
    editor: LineEditor,
    buffer: CommandBuffer,
    processing: bool,
    disabled: bool,
    cursor_placement: CursorPlacement,
}

impl Typewriter {
    /// Create the line editor and start accepting input
    pub fn mount(options: TypewriterOptions) -> Self {
        tracing::info!(
            "Mounting typewriter (disabled: {}, cursor placement: {:?})",
            options.disabled,
            options.cursor_placement
        );
        Self {
            editor: LineEditor::new(options.editor),
            buffer: CommandBuffer::new(),
            processing: false,
            disabled: options.disabled,
            cursor_placement: options.cursor_placement,
        }
    }

    pub fn buffer(&self) -> &CommandBuffer {
        &self.buffer
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// True between an insertion and the matching `finish_processing`
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled != disabled {
            tracing::debug!("Typewriter disabled: {}", disabled);
        }
        self.disabled = disabled;
    }

    /// Host acknowledges the last inserted command; submissions are accepted again
    pub fn finish_processing(&mut self) {
        if self.processing {
            tracing::debug!("Typewriter finished processing");
        }
        self.processing = false;
    }

    /// Route a key event into the line editor and react to its notifications
    pub fn handle_key<D>(&mut self, event: KeyEvent, document: &mut D) -> Result<Vec<SubmitOutcome>>
    where
        D: TargetDocument + ?Sized,
    {
        if self.disabled {
            tracing::debug!("Ignoring key {:?}: typewriter is disabled", event.code);
            return Ok(Vec::new());
        }
        self.editor.handle_key(event);
        self.dispatch_editor_events(document)
    }

    /// Route pasted text into the line editor
    pub fn paste<D>(&mut self, text: &str, document: &mut D) -> Result<Vec<SubmitOutcome>>
    where
        D: TargetDocument + ?Sized,
    {
        if self.disabled {
            tracing::debug!("Ignoring paste: typewriter is disabled");
            return Ok(Vec::new());
        }
        self.editor.paste(text);
        self.dispatch_editor_events(document)
    }

    /// Explicit execute request (the button path)
    pub fn submit<D>(&mut self, document: &mut D) -> Result<SubmitOutcome>
    where
        D: TargetDocument + ?Sized,
    {
        let outcome = self.run_command(document)?;
        self.dispatch_editor_events(document)?;
        Ok(outcome)
    }

    /// Keep the buffer in sync with the editor and strip line breaks.
    /// The corrected value is written back only when it differs, so the
    /// notification raised by the write-back is a no-op.
    pub fn on_content_changed(&mut self) {
        let raw = self.editor.value();
        let clean = CommandBuffer::from_raw(raw);
        if clean.as_str() != raw {
            tracing::debug!("Stripping line breaks from command input {:?}", raw);
            self.editor.set_value(clean.as_str());
        }
        self.buffer = clean;
    }

    fn dispatch_editor_events<D>(&mut self, document: &mut D) -> Result<Vec<SubmitOutcome>>
    where
        D: TargetDocument + ?Sized,
    {
        let mut outcomes = Vec::new();
        while let Some(event) = self.editor.next_event() {
            match event {
                LineEditorEvent::ContentChanged => self.on_content_changed(),
                LineEditorEvent::KeyUp(KeyCode::Enter) => {
                    outcomes.push(self.run_command(document)?);
                }
                LineEditorEvent::KeyUp(_) => {}
            }
        }
        Ok(outcomes)
    }

    fn run_command<D>(&mut self, document: &mut D) -> Result<SubmitOutcome>
    where
        D: TargetDocument + ?Sized,
    {
        if self.disabled {
            tracing::warn!("Refusing command: typewriter is disabled");
            return Ok(SubmitOutcome::Disabled);
        }
        if self.processing {
            tracing::warn!("Refusing command: previous command still processing");
            return Ok(SubmitOutcome::Busy);
        }
        if self.buffer.is_empty() {
            return Ok(SubmitOutcome::Empty);
        }

        tracing::debug!("Processing typewriter input {:?}", self.buffer.as_str());

        let at = document.end_position();
        let text = self.buffer.to_submission();
        let range = document.replace_range(EDIT_SOURCE, Range::collapsed(at), &text, false)?;
        self.processing = true;

        self.editor.set_value("");
        self.buffer.clear();

        let cursor = match self.cursor_placement {
            CursorPlacement::InsertionPoint => at,
            CursorPlacement::AfterInsertedText => range.end,
        };
        document.set_cursor(cursor)?;

        tracing::info!("Inserted command {:?} at {}", text.trim_end(), at);
        Ok(SubmitOutcome::Inserted { at, range, text })
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        tracing::info!("Unmounting typewriter");
    }
}

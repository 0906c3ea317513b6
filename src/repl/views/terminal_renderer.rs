//! # Terminal Renderer
//!
//! Draws the target document above the typewriter command line:
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │  1 theorem foo := by             │  document (tail follows the end)
//! │  2 exact rfl                     │
//! │  3                               │
//! │ proof.lean  lean4cmd  1:1  ready │  status line
//! │ > simp                 ^E Execute │  command line
//! └──────────────────────────────────┘
//! ```

use crate::repl::io::RenderStream;
use crate::repl::models::{TargetDocument, TextDocument};
use crate::repl::typewriter::Typewriter;
use anyhow::Result;
use crossterm::{
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use unicode_width::UnicodeWidthChar;

// Helper macro to convert crossterm errors to anyhow errors
macro_rules! execute_term {
    ($($arg:expr),* $(,)?) => {
        execute!($($arg),*).map_err(anyhow::Error::from)
    };
}

const PROMPT: &str = "> ";
const EXECUTE_HINT: &str = " ^E Execute";
const COMMAND_LINE_NUMBER: &str = "1 ";

/// Everything one frame needs
pub struct Screen<'a> {
    pub document: &'a TextDocument,
    pub typewriter: &'a Typewriter,
    pub title: &'a str,
    pub status: &'a str,
}

/// Trait for rendering views
pub trait ViewRenderer {
    /// Prepare the screen
    fn initialize(&mut self) -> Result<()>;

    /// Redraw document, status line and command line
    fn render_full(&mut self, screen: &Screen) -> Result<()>;

    /// Redraw only the command line and place the cursor in it
    fn render_command_line(&mut self, screen: &Screen) -> Result<()>;

    fn update_size(&mut self, width: u16, height: u16);

    /// Restore the terminal
    fn cleanup(&mut self) -> Result<()>;
}

/// Cut `text` to at most `width` display columns
fn fit_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut fitted = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        fitted.push(ch);
    }
    fitted
}

/// Width of the line number gutter, minimum 3
fn line_number_width(line_count: usize) -> usize {
    line_count.to_string().len().max(3)
}

/// Terminal renderer generic over the output stream
pub struct TerminalRenderer<RS: RenderStream> {
    render_stream: RS,
    terminal_size: (u16, u16),
}

impl<RS: RenderStream> TerminalRenderer<RS> {
    pub fn with_render_stream(render_stream: RS) -> Result<Self> {
        let terminal_size = render_stream.get_size()?;
        Ok(Self {
            render_stream,
            terminal_size,
        })
    }

    /// Terminal mode switches (raw mode, alternate screen) go straight to the stream
    pub fn render_stream_mut(&mut self) -> &mut RS {
        &mut self.render_stream
    }

    /// Rows available to the document
    fn document_height(&self) -> usize {
        (self.terminal_size.1 as usize).saturating_sub(2)
    }

    /// First document line shown, keeping the document end in view
    fn first_visible_line(&self, document: &TextDocument) -> usize {
        document
            .line_count()
            .saturating_sub(self.document_height())
    }

    fn render_document(&mut self, document: &TextDocument) -> Result<()> {
        let height = self.document_height();
        let width = self.terminal_size.0 as usize;
        let gutter = line_number_width(document.line_count());
        let first = self.first_visible_line(document);
        let cursor_line = document.cursor().line;

        for row in 0..height {
            self.render_stream.move_cursor(0, row as u16)?;
            match document.lines().get(first + row) {
                Some(line) => {
                    let number = first + row + 1;
                    if number - 1 == cursor_line {
                        execute_term!(self.render_stream, SetForegroundColor(Color::Yellow))?;
                    } else {
                        execute_term!(self.render_stream, SetAttribute(Attribute::Dim))?;
                    }
                    execute_term!(
                        self.render_stream,
                        Print(format!("{:>width$} ", number, width = gutter)),
                        SetAttribute(Attribute::Reset),
                        ResetColor
                    )?;
                    let text = fit_to_width(line, width.saturating_sub(gutter + 1));
                    execute_term!(self.render_stream, Print(text))?;
                }
                None => {
                    execute_term!(
                        self.render_stream,
                        SetForegroundColor(Color::DarkGrey),
                        Print("~"),
                        ResetColor
                    )?;
                }
            }
            self.render_stream.clear_line()?;
        }
        Ok(())
    }

    fn render_status_line(&mut self, screen: &Screen) -> Result<()> {
        let row = self.terminal_size.1.saturating_sub(2);
        let width = self.terminal_size.0 as usize;
        let state = if screen.typewriter.is_disabled() {
            "disabled"
        } else if screen.typewriter.is_processing() {
            "processing"
        } else {
            "ready"
        };
        let line = format!(
            " {}  {}  {}  {}  {}",
            screen.title,
            screen.typewriter.editor().options().language,
            screen.document.cursor(),
            state,
            screen.status
        );

        self.render_stream.move_cursor(0, row)?;
        execute_term!(
            self.render_stream,
            SetAttribute(Attribute::Reverse),
            Print(format!("{:<width$}", fit_to_width(&line, width), width = width)),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }
}

impl<RS: RenderStream> ViewRenderer for TerminalRenderer<RS> {
    fn initialize(&mut self) -> Result<()> {
        self.render_stream.clear_screen()?;
        self.render_stream.hide_cursor()?;
        Ok(())
    }

    fn render_full(&mut self, screen: &Screen) -> Result<()> {
        self.render_stream.hide_cursor()?;
        self.render_stream.clear_screen()?;
        self.render_document(screen.document)?;
        self.render_status_line(screen)?;
        self.render_command_line(screen)
    }

    fn render_command_line(&mut self, screen: &Screen) -> Result<()> {
        let row = self.terminal_size.1.saturating_sub(1);
        let width = self.terminal_size.0 as usize;
        let editor = screen.typewriter.editor();
        let gutter = if editor.options().line_numbers {
            COMMAND_LINE_NUMBER
        } else {
            ""
        };
        let prefix_width = gutter.len() + PROMPT.len();
        let input_width = width.saturating_sub(prefix_width + EXECUTE_HINT.len());

        self.render_stream.hide_cursor()?;
        self.render_stream.move_cursor(0, row)?;

        if !gutter.is_empty() {
            execute_term!(
                self.render_stream,
                SetAttribute(Attribute::Dim),
                Print(gutter),
                SetAttribute(Attribute::Reset)
            )?;
        }

        if screen.typewriter.is_disabled() {
            execute_term!(self.render_stream, SetAttribute(Attribute::Dim))?;
        } else {
            execute_term!(self.render_stream, SetForegroundColor(Color::Cyan))?;
        }
        execute_term!(self.render_stream, Print(PROMPT), ResetColor)?;
        let value = fit_to_width(editor.value(), input_width);
        execute_term!(
            self.render_stream,
            Print(format!("{:<input_width$}", value, input_width = input_width))
        )?;

        let hint_color = if screen.typewriter.is_processing() {
            Color::DarkGrey
        } else {
            Color::Magenta
        };
        execute_term!(
            self.render_stream,
            SetForegroundColor(hint_color),
            Print(EXECUTE_HINT),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        self.render_stream.clear_line()?;

        if !screen.typewriter.is_disabled() {
            let column = (prefix_width + editor.cursor_column().min(input_width)) as u16;
            self.render_stream.move_cursor(column, row)?;
            self.render_stream.show_cursor()?;
        }
        self.render_stream.flush()?;
        Ok(())
    }

    fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    fn cleanup(&mut self) -> Result<()> {
        self.render_stream.show_cursor()?;
        self.render_stream.flush()?;
        Ok(())
    }
}

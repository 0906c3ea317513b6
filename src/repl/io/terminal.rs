//! # Terminal I/O
//!
//! crossterm-backed event and render streams used by the binary.

use super::{EventStream, RenderStream, TerminalSize};
use anyhow::Result;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, Command, QueueableCommand};
use std::io::{self, Write};
use std::time::Duration;

/// Blocking reader over crossterm's global event queue
#[derive(Debug, Default)]
pub struct TerminalEventStream;

impl TerminalEventStream {
    pub fn new() -> Self {
        Self
    }
}

impl EventStream for TerminalEventStream {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(event::read()?)
    }
}

/// Writes escape sequences to any byte sink, stdout in the binary
pub struct TerminalRenderStream<W: Write = io::Stdout> {
    out: W,
}

impl TerminalRenderStream {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderStream {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderStream<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    /// Queue one command and push it out
    fn apply(&mut self, command: impl Command) -> Result<()> {
        self.out.queue(command)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Write for TerminalRenderStream<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write + Send> RenderStream for TerminalRenderStream<W> {
    fn clear_screen(&mut self) -> Result<()> {
        self.apply(Clear(ClearType::All))
    }

    fn clear_line(&mut self) -> Result<()> {
        self.apply(Clear(ClearType::UntilNewLine))
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.apply(cursor::MoveTo(x, y))
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.apply(cursor::Hide)
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.apply(cursor::Show)
    }

    fn get_size(&self) -> Result<TerminalSize> {
        Ok(terminal::size()?)
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.apply(EnterAlternateScreen)
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.apply(LeaveAlternateScreen)
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        Ok(terminal::enable_raw_mode()?)
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        Ok(terminal::disable_raw_mode()?)
    }

    fn set_bracketed_paste(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.apply(EnableBracketedPaste)
        } else {
            self.apply(DisableBracketedPaste)
        }
    }
}

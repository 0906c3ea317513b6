//! # Mock I/O Implementations
//!
//! Scripted event input and recording render output, for driving the
//! application without a terminal.

use super::{EventStream, RenderStream, TerminalSize};
use anyhow::Result;
use crossterm::event::Event;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Pre-programmed event stream, exhausted once every event has been read
pub struct MockEventStream {
    events: VecDeque<Event>,
}

impl MockEventStream {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl EventStream for MockEventStream {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No events available"))
    }

    fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for MockEventStream {
    fn default() -> Self {
        Self::empty()
    }
}

/// Recorded render command for verification
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ClearScreen,
    ClearLine,
    MoveCursor(u16, u16),
    HideCursor,
    ShowCursor,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    EnableRawMode,
    DisableRawMode,
    BracketedPaste(bool),
    Write(Vec<u8>),
    Flush,
}

#[derive(Debug, Default)]
struct Recording {
    commands: Vec<RenderCommand>,
    output: Vec<u8>,
}

/// Render stream that records everything written to it.
///
/// Clones share the same recording, so a test can keep a clone while the
/// original is moved into the renderer.
#[derive(Debug, Clone)]
pub struct MockRenderStream {
    recording: Arc<Mutex<Recording>>,
    terminal_size: TerminalSize,
}

impl MockRenderStream {
    pub fn new() -> Self {
        Self::with_size((80, 24))
    }

    pub fn with_size(size: TerminalSize) -> Self {
        Self {
            recording: Arc::new(Mutex::new(Recording::default())),
            terminal_size: size,
        }
    }

    fn recording(&self) -> MutexGuard<'_, Recording> {
        self.recording
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, command: RenderCommand) {
        self.recording().commands.push(command);
    }

    pub fn get_commands(&self) -> Vec<RenderCommand> {
        self.recording().commands.clone()
    }

    pub fn has_command(&self, command: &RenderCommand) -> bool {
        self.recording().commands.contains(command)
    }

    /// Everything written since the last screen clear
    pub fn get_buffer_string(&self) -> String {
        String::from_utf8_lossy(&self.recording().output).to_string()
    }
}

impl Default for MockRenderStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MockRenderStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut recording = self.recording();
        recording.output.extend_from_slice(buf);
        recording.commands.push(RenderCommand::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.record(RenderCommand::Flush);
        Ok(())
    }
}

impl RenderStream for MockRenderStream {
    fn clear_screen(&mut self) -> Result<()> {
        let mut recording = self.recording();
        recording.commands.push(RenderCommand::ClearScreen);
        recording.output.clear();
        Ok(())
    }

    fn clear_line(&mut self) -> Result<()> {
        self.record(RenderCommand::ClearLine);
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.record(RenderCommand::MoveCursor(x, y));
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::HideCursor);
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::ShowCursor);
        Ok(())
    }

    fn get_size(&self) -> Result<TerminalSize> {
        Ok(self.terminal_size)
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::EnterAlternateScreen);
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::LeaveAlternateScreen);
        Ok(())
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::EnableRawMode);
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::DisableRawMode);
        Ok(())
    }

    fn set_bracketed_paste(&mut self, enabled: bool) -> Result<()> {
        self.record(RenderCommand::BracketedPaste(enabled));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn mock_event_stream_should_provide_events_in_order() -> Result<()> {
        let mut stream = MockEventStream::new(vec![
            Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty())),
            Event::Paste("rfl".to_string()),
        ]);

        assert!(stream.poll(Duration::from_millis(0))?);
        assert!(matches!(stream.read()?, Event::Key(k) if k.code == KeyCode::Char('a')));
        assert!(matches!(stream.read()?, Event::Paste(ref text) if text == "rfl"));

        assert!(!stream.poll(Duration::from_millis(0))?);
        assert!(stream.is_exhausted());
        assert!(stream.read().is_err());
        Ok(())
    }

    #[test]
    fn mock_render_stream_should_record_commands() -> Result<()> {
        let mut stream = MockRenderStream::new();

        stream.clear_screen()?;
        stream.move_cursor(3, 4)?;
        stream.write_all(b"simp")?;
        stream.flush()?;

        assert!(stream.has_command(&RenderCommand::ClearScreen));
        assert!(stream.has_command(&RenderCommand::MoveCursor(3, 4)));
        assert_eq!(stream.get_buffer_string(), "simp");
        Ok(())
    }

    #[test]
    fn clones_share_recording() -> Result<()> {
        let stream = MockRenderStream::with_size((40, 10));
        let mut moved = stream.clone();

        moved.write_all(b"exact")?;

        assert_eq!(stream.get_buffer_string(), "exact");
        assert_eq!(stream.get_size()?, (40, 10));
        Ok(())
    }

    #[test]
    fn clear_screen_resets_buffer_string() -> Result<()> {
        let mut stream = MockRenderStream::new();
        stream.write_all(b"old")?;
        stream.clear_screen()?;
        stream.write_all(b"new")?;
        assert_eq!(stream.get_buffer_string(), "new");
        Ok(())
    }
}

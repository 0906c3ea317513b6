//! # Application Controller
//!
//! Owns the target document and the mounted typewriter, and runs the event
//! loop: terminal events go into the typewriter, inserted commands are
//! persisted to disk, and the screen is redrawn.

use crate::cmd_args::CommandLineArgs;
use crate::repl::{
    editor::is_chord,
    io::{EventStream, RenderStream, TerminalEventStream, TerminalRenderStream},
    models::TextDocument,
    typewriter::{SubmitOutcome, Typewriter},
    views::{Screen, TerminalRenderer, ViewRenderer},
};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// What a key press asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Execute,
    Edit,
}

fn classify_key(event: &KeyEvent) -> KeyAction {
    let ctrl_only = event.modifiers.contains(KeyModifiers::CONTROL) && is_chord(event.modifiers);
    if event.kind != KeyEventKind::Press || !ctrl_only {
        return KeyAction::Edit;
    }
    match event.code {
        KeyCode::Char('c') | KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('e') => KeyAction::Execute,
        _ => KeyAction::Edit,
    }
}

/// The main application controller
pub struct AppController<ES: EventStream, RS: RenderStream> {
    document: TextDocument,
    document_path: PathBuf,
    title: String,
    status: String,
    typewriter: Typewriter,
    view_renderer: TerminalRenderer<RS>,
    event_stream: ES,
    should_quit: bool,
}

impl AppController<TerminalEventStream, TerminalRenderStream<io::Stdout>> {
    /// Controller on the real terminal
    pub async fn new(cmd_args: CommandLineArgs) -> Result<Self> {
        Self::with_io_streams(
            cmd_args,
            TerminalEventStream::new(),
            TerminalRenderStream::new(),
        )
        .await
    }
}

impl<ES: EventStream, RS: RenderStream> AppController<ES, RS> {
    /// Create controller with injected I/O streams
    pub async fn with_io_streams(
        cmd_args: CommandLineArgs,
        event_stream: ES,
        render_stream: RS,
    ) -> Result<Self> {
        let document_path = cmd_args.file().to_path_buf();
        let document = TextDocument::load(&document_path).await?;
        let title = document_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| document_path.display().to_string());

        let view_renderer = TerminalRenderer::with_render_stream(render_stream)?;
        let typewriter = Typewriter::mount(cmd_args.typewriter_options());

        Ok(Self {
            document,
            document_path,
            title,
            status: String::new(),
            typewriter,
            view_renderer,
            event_stream,
            should_quit: false,
        })
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn render_full(&mut self) -> Result<()> {
        let Self {
            document,
            typewriter,
            title,
            status,
            view_renderer,
            ..
        } = self;
        view_renderer.render_full(&Screen {
            document,
            typewriter,
            title,
            status,
        })
    }

    fn render_command_line(&mut self) -> Result<()> {
        let Self {
            document,
            typewriter,
            title,
            status,
            view_renderer,
            ..
        } = self;
        view_renderer.render_command_line(&Screen {
            document,
            typewriter,
            title,
            status,
        })
    }

    /// Run the application until quit or until the event stream runs dry
    pub async fn run(&mut self) -> Result<()> {
        self.enter_terminal()?;
        let result = self.event_loop().await;
        let restored = self.leave_terminal();
        result.and(restored)
    }

    fn enter_terminal(&mut self) -> Result<()> {
        let stream = self.view_renderer.render_stream_mut();
        stream.enable_raw_mode()?;
        stream.enter_alternate_screen()?;
        stream.set_bracketed_paste(true)?;
        self.view_renderer.initialize()
    }

    fn leave_terminal(&mut self) -> Result<()> {
        self.view_renderer.cleanup()?;
        let stream = self.view_renderer.render_stream_mut();
        stream.set_bracketed_paste(false)?;
        stream.leave_alternate_screen()?;
        stream.disable_raw_mode()
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.render_full()?;

        while !self.should_quit && !self.event_stream.is_exhausted() {
            if self.event_stream.poll(Duration::from_millis(100))? {
                let event = self.event_stream.read()?;
                self.handle_event(event).await?;
            }
        }

        tracing::info!("Leaving event loop (quit requested: {})", self.should_quit);
        Ok(())
    }

    /// Process a single terminal event
    pub async fn handle_event(&mut self, event: Event) -> Result<()> {
        let outcomes = match event {
            Event::Key(key_event) => {
                tracing::debug!("Received key event: {:?}", key_event);
                match classify_key(&key_event) {
                    KeyAction::Quit => {
                        self.should_quit = true;
                        return Ok(());
                    }
                    KeyAction::Execute => vec![self.typewriter.submit(&mut self.document)?],
                    KeyAction::Edit => self.typewriter.handle_key(key_event, &mut self.document)?,
                }
            }
            Event::Paste(text) => {
                tracing::debug!("Received paste of {} bytes", text.len());
                self.typewriter.paste(&text, &mut self.document)?
            }
            Event::Resize(width, height) => {
                self.view_renderer.update_size(width, height);
                return self.render_full();
            }
            _ => return Ok(()),
        };

        if self.apply_outcomes(outcomes).await? {
            self.render_full()
        } else {
            self.render_command_line()
        }
    }

    /// Persist inserted commands and update the status line.
    /// Returns true when the whole screen needs a redraw.
    async fn apply_outcomes(&mut self, outcomes: Vec<SubmitOutcome>) -> Result<bool> {
        let mut redraw = false;
        for outcome in outcomes {
            match outcome {
                SubmitOutcome::Inserted { at, text, .. } => {
                    self.document.save(&self.document_path).await?;
                    self.typewriter.finish_processing();
                    self.status = format!("inserted {:?} at {}", text.trim_end(), at);
                    redraw = true;
                }
                SubmitOutcome::Busy => {
                    self.status = "busy: previous command still processing".to_string();
                    redraw = true;
                }
                SubmitOutcome::Disabled => {
                    self.status = "command line is disabled".to_string();
                    redraw = true;
                }
                SubmitOutcome::Empty => {}
            }
        }
        Ok(redraw)
    }
}

//! # Line Editor
//!
//! The editable surface behind the typewriter: a small code-editor widget
//! holding one value and a cursor. It knows nothing about commands or
//! documents; it only edits its value and queues notifications
//! ([`LineEditorEvent`]) for whoever owns it.
//!
//! Like a full code editor, it will happily accept a line break (Enter,
//! pasted text). Keeping the value on one line is the owner's job.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::VecDeque;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Construction options for the line editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEditorOptions {
    /// Language id used for highlighting the command line
    pub language: String,
    /// Offer completions while typing; the command line keeps them off
    pub quick_suggestions: bool,
    /// Number of spaces inserted by Tab
    pub tab_size: usize,
    /// Show a line number gutter in front of the value
    pub line_numbers: bool,
    /// When false, a key-up notification is synthesized right after each key
    /// press, since terminals only report releases with keyboard enhancement
    pub report_key_release: bool,
}

impl Default for LineEditorOptions {
    fn default() -> Self {
        Self {
            language: "lean4cmd".to_string(),
            quick_suggestions: false,
            tab_size: 2,
            line_numbers: false,
            report_key_release: false,
        }
    }
}

/// True when a key event is a shortcut chord rather than text input.
///
/// AltGr arrives as CONTROL|ALT on Windows and is how `[ ] { } @ ~` are typed
/// on many layouts, so that combination counts as text.
pub fn is_chord(modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    ctrl != alt
}

/// Notifications raised by the line editor, delivered in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditorEvent {
    /// The value changed (by typing, pasting or `set_value`)
    ContentChanged,
    /// A key was released
    KeyUp(KeyCode),
}

/// Single value code editor
#[derive(Debug)]
pub struct LineEditor {
    options: LineEditorOptions,
    value: String,
    /// Byte offset, always on a grapheme boundary
    cursor: usize,
    pending: VecDeque<LineEditorEvent>,
}

impl LineEditor {
    pub fn new(options: LineEditorOptions) -> Self {
        tracing::debug!(
            "Creating line editor (language: {}, tab size: {}, suggestions: {}, line numbers: {})",
            options.language,
            options.tab_size,
            options.quick_suggestions,
            options.line_numbers
        );
        Self {
            options,
            value: String::new(),
            cursor: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn options(&self) -> &LineEditorOptions {
        &self.options
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the whole value; the cursor goes to the end.
    /// Always raises a content-change notification.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
        self.pending.push_back(LineEditorEvent::ContentChanged);
    }

    /// Cursor as a display column, for rendering
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor].width()
    }

    /// Next queued notification
    pub fn next_event(&mut self) -> Option<LineEditorEvent> {
        self.pending.pop_front()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Insert pasted text at the cursor
    pub fn paste(&mut self, text: &str) {
        if !text.is_empty() {
            self.insert_str(text);
        }
    }

    /// Apply a terminal key event
    pub fn handle_key(&mut self, event: KeyEvent) {
        if event.kind == KeyEventKind::Release {
            if self.options.report_key_release {
                self.pending.push_back(LineEditorEvent::KeyUp(event.code));
            }
            return;
        }

        match event.code {
            KeyCode::Char(ch) if !is_chord(event.modifiers) => self.insert_str(ch.encode_utf8(&mut [0; 4])),
            KeyCode::Enter => self.insert_str("\n"),
            KeyCode::Tab => {
                let indent = " ".repeat(self.options.tab_size);
                self.insert_str(&indent);
            }
            KeyCode::Backspace => self.delete_before_cursor(),
            KeyCode::Delete => self.delete_after_cursor(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            _ => {}
        }

        if !self.options.report_key_release {
            self.pending.push_back(LineEditorEvent::KeyUp(event.code));
        }
    }

    fn insert_str(&mut self, text: &str) {
        self.value.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.pending.push_back(LineEditorEvent::ContentChanged);
    }

    fn previous_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(offset, _)| offset)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .graphemes(true)
            .next()
            .map(|grapheme| self.cursor + grapheme.len())
    }

    fn delete_before_cursor(&mut self) {
        if let Some(start) = self.previous_boundary() {
            self.value.replace_range(start..self.cursor, "");
            self.cursor = start;
            self.pending.push_back(LineEditorEvent::ContentChanged);
        }
    }

    fn delete_after_cursor(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.value.replace_range(self.cursor..end, "");
            self.pending.push_back(LineEditorEvent::ContentChanged);
        }
    }

    fn move_left(&mut self) {
        if let Some(start) = self.previous_boundary() {
            self.cursor = start;
        }
    }

    fn move_right(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.cursor = end;
        }
    }
}

impl Drop for LineEditor {
    fn drop(&mut self) {
        tracing::debug!("Disposing line editor ({})", self.options.language);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn drain(editor: &mut LineEditor) -> Vec<LineEditorEvent> {
        std::iter::from_fn(|| editor.next_event()).collect()
    }

    #[test]
    fn typing_raises_change_then_key_up() {
        let mut editor = LineEditor::new(LineEditorOptions::default());

        editor.handle_key(key(KeyCode::Char('r')));

        assert_eq!(editor.value(), "r");
        assert_eq!(
            drain(&mut editor),
            vec![
                LineEditorEvent::ContentChanged,
                LineEditorEvent::KeyUp(KeyCode::Char('r'))
            ]
        );
    }

    #[test]
    fn enter_inserts_line_break_like_a_code_editor() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.paste("rfl");
        drain(&mut editor);

        editor.handle_key(key(KeyCode::Enter));

        assert_eq!(editor.value(), "rfl\n");
        assert_eq!(
            drain(&mut editor),
            vec![
                LineEditorEvent::ContentChanged,
                LineEditorEvent::KeyUp(KeyCode::Enter)
            ]
        );
    }

    #[test]
    fn cursor_movement_does_not_raise_change() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.paste("ab");
        drain(&mut editor);

        editor.handle_key(key(KeyCode::Left));

        assert_eq!(drain(&mut editor), vec![LineEditorEvent::KeyUp(KeyCode::Left)]);
        assert_eq!(editor.cursor_column(), 1);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.paste("ae\u{301}");

        editor.handle_key(key(KeyCode::Backspace));

        assert_eq!(editor.value(), "a");
    }

    #[test]
    fn backspace_at_start_changes_nothing() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            drain(&mut editor),
            vec![LineEditorEvent::KeyUp(KeyCode::Backspace)]
        );
    }

    #[test]
    fn delete_and_home_edit_at_cursor() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.paste("xsimp");
        editor.handle_key(key(KeyCode::Home));
        editor.handle_key(key(KeyCode::Delete));
        assert_eq!(editor.value(), "simp");

        editor.handle_key(key(KeyCode::End));
        editor.handle_key(key(KeyCode::Char('!')));
        assert_eq!(editor.value(), "simp!");
    }

    #[test]
    fn tab_inserts_configured_spaces() {
        let options = LineEditorOptions {
            tab_size: 4,
            ..LineEditorOptions::default()
        };
        let mut editor = LineEditor::new(options);
        editor.handle_key(key(KeyCode::Tab));
        assert_eq!(editor.value(), "    ");
    }

    #[test]
    fn control_chords_are_not_inserted() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL));
        assert_eq!(editor.value(), "");
    }

    #[test]
    fn altgr_chars_are_inserted() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        for ch in ['[', 'h', ']'] {
            let modifiers = if ch == 'h' { KeyModifiers::NONE } else { altgr };
            editor.handle_key(KeyEvent::new(KeyCode::Char(ch), modifiers));
        }
        assert_eq!(editor.value(), "[h]");
    }

    #[test]
    fn alt_alone_is_a_chord() {
        assert!(is_chord(KeyModifiers::ALT));
        assert!(is_chord(KeyModifiers::CONTROL));
        assert!(!is_chord(KeyModifiers::CONTROL | KeyModifiers::ALT));
        assert!(!is_chord(KeyModifiers::SHIFT));
    }

    #[test]
    fn default_options_suppress_suggestions_and_line_numbers() {
        let options = LineEditorOptions::default();
        assert!(!options.quick_suggestions);
        assert!(!options.line_numbers);
        assert_eq!(options.tab_size, 2);
    }

    #[test]
    fn shifted_chars_are_inserted() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.handle_key(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT));
        assert_eq!(editor.value(), "R");
    }

    #[test]
    fn key_up_follows_release_when_reported() {
        let options = LineEditorOptions {
            report_key_release: true,
            ..LineEditorOptions::default()
        };
        let mut editor = LineEditor::new(options);

        editor.handle_key(key(KeyCode::Enter));
        assert_eq!(drain(&mut editor), vec![LineEditorEvent::ContentChanged]);

        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        editor.handle_key(release);
        assert_eq!(drain(&mut editor), vec![LineEditorEvent::KeyUp(KeyCode::Enter)]);
        assert_eq!(editor.value(), "\n");
    }

    #[test]
    fn set_value_raises_change_and_moves_cursor_to_end() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.set_value("exact h");
        assert_eq!(drain(&mut editor), vec![LineEditorEvent::ContentChanged]);
        assert_eq!(editor.cursor_column(), 7);
    }

    #[test]
    fn cursor_column_uses_display_width() {
        let mut editor = LineEditor::new(LineEditorOptions::default());
        editor.paste("証明");
        assert_eq!(editor.cursor_column(), 4);
    }
}

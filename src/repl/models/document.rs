//! # Target Document
//!
//! The multi-line document that submitted commands are appended to.
//! The typewriter only talks to it through [`TargetDocument`]; [`TextDocument`]
//! is the line-based implementation used by the terminal front-end.

use crate::repl::geometry::{Position, Range};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Edit surface of a document that receives typewriter commands
pub trait TargetDocument {
    /// Position just past the last character of the document
    fn end_position(&self) -> Position;

    /// Replace `range` with `text` and return the range now covered by `text`.
    ///
    /// `source` identifies the editing party for logging. When
    /// `force_move_markers` is false a cursor sitting exactly at the start of
    /// an empty range is left in place instead of being pushed past the
    /// inserted text.
    fn replace_range(
        &mut self,
        source: &str,
        range: Range,
        text: &str,
        force_move_markers: bool,
    ) -> Result<Range>;

    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, position: Position) -> Result<()>;

    /// Full document text
    fn text(&self) -> String;
}

/// Line terminator a document is written back with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// CRLF when the first line break of `text` is `\r\n`
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(index) if text[..index].ends_with('\r') => LineEnding::Crlf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Line-based in-memory document. Lines never hold their terminator; the
/// detected [`LineEnding`] is applied again by [`TargetDocument::text`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    lines: Vec<String>,
    line_ending: LineEnding,
    cursor: Position,
    version: u64,
}

impl TextDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            line_ending: LineEnding::default(),
            cursor: Position::origin(),
            version: 0,
        }
    }

    /// Create a document from text. A trailing line break yields an empty last line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect(),
            line_ending: LineEnding::detect(text),
            cursor: Position::origin(),
            version: 0,
        }
    }

    /// Load a document from disk; a missing file starts an empty document
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                tracing::debug!("Loaded document from '{}'", path.display());
                Ok(Self::from_text(&text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Document '{}' does not exist yet, starting empty",
                    path.display()
                );
                Ok(Self::new())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read '{}'", path.display())),
        }
    }

    /// Write the document to disk
    pub async fn save(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.text())
            .await
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::debug!("Saved document version {} to '{}'", self.version, path.display());
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line length in chars
    pub fn line_length(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, |line| line.chars().count())
    }

    /// Number of edits applied since the document was created
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_valid_position(&self, position: Position) -> bool {
        position.line < self.lines.len() && position.column <= self.line_length(position.line)
    }

    fn byte_offset(line: &str, column: usize) -> usize {
        line.char_indices()
            .nth(column)
            .map_or(line.len(), |(offset, _)| offset)
    }

    fn delete(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }

        let start_line = range.start.line;
        let end_line = range.end.line;
        let end_offset = Self::byte_offset(&self.lines[end_line], range.end.column);
        let tail = self.lines[end_line][end_offset..].to_string();

        let start_offset = Self::byte_offset(&self.lines[start_line], range.start.column);
        self.lines[start_line].truncate(start_offset);
        self.lines[start_line].push_str(&tail);
        self.lines.drain(start_line + 1..=end_line);
    }

    fn insert(&mut self, position: Position, text: &str) {
        let offset = Self::byte_offset(&self.lines[position.line], position.column);
        let after_cursor = self.lines[position.line].split_off(offset);

        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            self.lines[position.line].push_str(first);
        }

        let mut line_index = position.line;
        for piece in pieces {
            line_index += 1;
            self.lines.insert(line_index, piece.to_string());
        }
        self.lines[line_index].push_str(&after_cursor);
    }

    /// Where a marker at `marker` ends up after `range` is replaced by text
    /// ending at `new_end`
    fn shift_marker(
        marker: Position,
        range: Range,
        new_end: Position,
        force_move_markers: bool,
    ) -> Position {
        if range.is_empty() && marker == range.start {
            return if force_move_markers { new_end } else { marker };
        }
        if marker <= range.start {
            return marker;
        }
        if marker < range.end {
            return range.start;
        }
        if marker.line == range.end.line {
            Position::new(new_end.line, new_end.column + (marker.column - range.end.column))
        } else {
            Position::new(marker.line - range.end.line + new_end.line, marker.column)
        }
    }
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetDocument for TextDocument {
    fn end_position(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, self.line_length(last))
    }

    fn replace_range(
        &mut self,
        source: &str,
        range: Range,
        text: &str,
        force_move_markers: bool,
    ) -> Result<Range> {
        if range.start > range.end {
            bail!(
                "{}: inverted edit range {} .. {}",
                source,
                range.start,
                range.end
            );
        }
        if !self.is_valid_position(range.start) || !self.is_valid_position(range.end) {
            bail!(
                "{}: edit range {} .. {} lies outside the document (end {})",
                source,
                range.start,
                range.end,
                self.end_position()
            );
        }

        let text = text.replace("\r\n", "\n");
        self.delete(range);
        self.insert(range.start, &text);

        let new_end = range.start.advanced_by(&text);
        self.cursor = Self::shift_marker(self.cursor, range, new_end, force_move_markers);
        self.version += 1;

        tracing::debug!(
            "{}: replaced {} .. {} with {:?} (version {})",
            source,
            range.start,
            range.end,
            text,
            self.version
        );

        Ok(Range::new(range.start, new_end))
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, position: Position) -> Result<()> {
        if !self.is_valid_position(position) {
            bail!(
                "cursor position {} lies outside the document (end {})",
                position,
                self.end_position()
            );
        }
        self.cursor = position;
        Ok(())
    }

    fn text(&self) -> String {
        self.lines.join(self.line_ending.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_single_empty_line() {
        let doc = TextDocument::new();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.end_position(), Position::origin());
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn from_text_keeps_trailing_empty_line() {
        let doc = TextDocument::from_text("theorem foo := by\n");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.end_position(), Position::new(1, 0));
        assert_eq!(doc.text(), "theorem foo := by\n");
    }

    #[test]
    fn crlf_document_keeps_its_line_endings() -> Result<()> {
        let mut doc = TextDocument::from_text("theorem foo := by\r\n  intro\r\n");
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
        assert_eq!(doc.lines()[0], "theorem foo := by");
        assert_eq!(doc.end_position(), Position::new(2, 0));

        let end = doc.end_position();
        let range = doc.replace_range("test", Range::collapsed(end), "exact rfl\n", false)?;

        assert_eq!(range.end, Position::new(3, 0));
        assert_eq!(doc.text(), "theorem foo := by\r\n  intro\r\nexact rfl\r\n");
        Ok(())
    }

    #[test]
    fn crlf_in_inserted_text_is_one_line_break() -> Result<()> {
        let mut doc = TextDocument::from_text("a\n");
        let range = doc.replace_range("test", Range::collapsed(Position::new(1, 0)), "b\r\nc", false)?;
        assert_eq!(range.end, Position::new(2, 1));
        assert_eq!(doc.text(), "a\nb\nc");
        Ok(())
    }

    #[test]
    fn end_position_counts_chars() {
        let doc = TextDocument::from_text("example : ∀ n, n = n");
        assert_eq!(doc.end_position(), Position::new(0, 20));
    }

    #[test]
    fn insert_at_end_appends_line() -> Result<()> {
        let mut doc = TextDocument::from_text("theorem foo := by\n");
        let end = doc.end_position();

        let inserted = doc.replace_range("test", Range::collapsed(end), "exact rfl\n", false)?;

        assert_eq!(doc.text(), "theorem foo := by\nexact rfl\n");
        assert_eq!(inserted, Range::new(Position::new(1, 0), Position::new(2, 0)));
        assert_eq!(doc.version(), 1);
        Ok(())
    }

    #[test]
    fn insert_in_middle_of_line_keeps_tail() -> Result<()> {
        let mut doc = TextDocument::from_text("ab");
        doc.replace_range("test", Range::collapsed(Position::new(0, 1)), "X\nY", false)?;
        assert_eq!(doc.lines(), &["aX".to_string(), "Yb".to_string()]);
        Ok(())
    }

    #[test]
    fn replace_multi_line_range() -> Result<()> {
        let mut doc = TextDocument::from_text("one\ntwo\nthree");
        let range = Range::new(Position::new(0, 1), Position::new(2, 2));
        doc.replace_range("test", range, "-", false)?;
        assert_eq!(doc.text(), "o-ree");
        Ok(())
    }

    #[test]
    fn replace_handles_multibyte_columns() -> Result<()> {
        let mut doc = TextDocument::from_text("∀ x");
        doc.replace_range("test", Range::collapsed(Position::new(0, 1)), "ε", false)?;
        assert_eq!(doc.text(), "∀ε x");
        Ok(())
    }

    #[test]
    fn cursor_at_insertion_point_stays_without_force() -> Result<()> {
        let mut doc = TextDocument::from_text("a\n");
        let end = doc.end_position();
        doc.set_cursor(end)?;

        doc.replace_range("test", Range::collapsed(end), "b\n", false)?;

        assert_eq!(doc.cursor(), end);
        Ok(())
    }

    #[test]
    fn cursor_at_insertion_point_moves_with_force() -> Result<()> {
        let mut doc = TextDocument::from_text("a\n");
        let end = doc.end_position();
        doc.set_cursor(end)?;

        doc.replace_range("test", Range::collapsed(end), "b\n", true)?;

        assert_eq!(doc.cursor(), Position::new(2, 0));
        Ok(())
    }

    #[test]
    fn cursor_after_edit_is_shifted() -> Result<()> {
        let mut doc = TextDocument::from_text("abc\ndef");
        doc.set_cursor(Position::new(1, 2))?;
        doc.replace_range("test", Range::collapsed(Position::new(0, 0)), "x\n", false)?;
        assert_eq!(doc.cursor(), Position::new(2, 2));

        doc.set_cursor(Position::new(1, 3))?;
        doc.replace_range("test", Range::collapsed(Position::new(1, 1)), "yy", false)?;
        assert_eq!(doc.cursor(), Position::new(1, 5));
        Ok(())
    }

    #[test]
    fn cursor_before_edit_is_untouched() -> Result<()> {
        let mut doc = TextDocument::from_text("abc\ndef");
        doc.set_cursor(Position::new(0, 1))?;
        let end = doc.end_position();
        doc.replace_range("test", Range::collapsed(end), "\nghi", false)?;
        assert_eq!(doc.cursor(), Position::new(0, 1));
        Ok(())
    }

    #[test]
    fn replace_outside_document_fails() {
        let mut doc = TextDocument::from_text("abc");
        let result = doc.replace_range("test", Range::collapsed(Position::new(3, 0)), "x", false);
        assert!(result.is_err());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn inverted_range_fails() {
        let mut doc = TextDocument::from_text("abc");
        let range = Range::new(Position::new(0, 2), Position::new(0, 1));
        assert!(doc.replace_range("test", range, "", false).is_err());
    }

    #[test]
    fn set_cursor_rejects_invalid_position() {
        let mut doc = TextDocument::from_text("abc");
        assert!(doc.set_cursor(Position::new(0, 4)).is_err());
        assert!(doc.set_cursor(Position::new(0, 3)).is_ok());
    }

    #[tokio::test]
    async fn load_missing_file_gives_empty_document() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let doc = TextDocument::load(&dir.path().join("missing.lean")).await?;
        assert_eq!(doc, TextDocument::new());
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_preserves_text() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("proof.lean");
        let doc = TextDocument::from_text("theorem foo := by\nexact rfl\n");

        doc.save(&path).await?;
        let loaded = TextDocument::load(&path).await?;

        assert_eq!(loaded.text(), "theorem foo := by\nexact rfl\n");
        Ok(())
    }

    #[tokio::test]
    async fn crlf_file_round_trips_after_append() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("windows.lean");
        std::fs::write(&path, "theorem foo := by\r\n")?;

        let mut doc = TextDocument::load(&path).await?;
        let end = doc.end_position();
        doc.replace_range("test", Range::collapsed(end), "simp\n", false)?;
        doc.save(&path).await?;

        assert_eq!(std::fs::read_to_string(&path)?, "theorem foo := by\r\nsimp\r\n");
        Ok(())
    }
}

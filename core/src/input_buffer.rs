//! Text field with caret tracking.
//!
//! The buffer stands in for the host's text control: the session reads the
//! characters before the caret, hands them to the automaton and splices the
//! result back in.

use crate::utils::normalize;

/// Number of characters before the caret the automaton may still edit.
pub const EDITING_WINDOW: usize = 2;

/// Text field tracking the caret position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize, // Byte offset, not char offset
}

impl InputBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` (NFC-normalized) with the caret at the end.
    pub fn from_text(text: &str) -> Self {
        let text = normalize(text);
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the cursor position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clear the buffer and reset cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Move cursor to the left by one character.
    pub fn move_left(&mut self) -> bool {
        match self.prev_boundary(self.cursor) {
            Some(prev) => {
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    /// Move cursor to the right by one character.
    pub fn move_right(&mut self) -> bool {
        match self.text[self.cursor..].chars().next() {
            Some(ch) => {
                self.cursor += ch.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Set the cursor position (must be at a character boundary).
    pub fn set_cursor(&mut self, pos: usize) -> bool {
        if pos <= self.text.len() && self.text.is_char_boundary(pos) {
            self.cursor = pos;
            true
        } else {
            false
        }
    }

    /// Byte offset where the editing window starts.
    fn window_start(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .rev()
            .take(EDITING_WINDOW)
            .last()
            .map_or(self.cursor, |(i, _)| i)
    }

    /// Up to two characters immediately before the caret.
    pub fn editing_window(&self) -> &str {
        &self.text[self.window_start()..self.cursor]
    }

    /// Replace the editing window with `replacement`, leaving the caret after it.
    pub fn replace_editing_window(&mut self, replacement: &str) {
        let start = self.window_start();
        self.text.replace_range(start..self.cursor, replacement);
        self.cursor = start + replacement.len();
    }

    fn prev_boundary(&self, pos: usize) -> Option<usize> {
        self.text[..pos].char_indices().next_back().map(|(i, _)| i)
    }
}

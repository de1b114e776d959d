//! Hangul session management.
//!
//! `HangulSession` wires an automaton to a text field. Each key reads the
//! editing window before the caret, runs the automaton on it, and replaces
//! the window with `output + editing`, so the field text is the same whether
//! or not a character has been finalized yet.

use tracing::trace;

use crate::automata::{Composed, HangulAutomata, BACKSPACE};
use crate::input_buffer::InputBuffer;

/// Text field driven by a composition automaton.
#[derive(Debug, Clone)]
pub struct HangulSession<A> {
    automata: A,
    buffer: InputBuffer,
}

impl<A: HangulAutomata> HangulSession<A> {
    pub fn new(automata: A) -> Self {
        Self {
            automata,
            buffer: InputBuffer::new(),
        }
    }

    /// Start from existing text with the caret at the end.
    pub fn with_text(automata: A, text: &str) -> Self {
        Self {
            automata,
            buffer: InputBuffer::from_text(text),
        }
    }

    pub fn automata(&self) -> &A {
        &self.automata
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InputBuffer {
        &mut self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Apply one key's candidate set (e.g. `"ㄱㅋㄲ"`) at the caret.
    pub fn input_key(&mut self, input: &str) -> Composed {
        if input.starts_with(BACKSPACE) {
            let editing = self.backspace();
            return Composed {
                editing,
                output: String::new(),
            };
        }

        let window = self.buffer.editing_window().to_owned();
        let composed = self.automata.input_character(&window, input);
        trace!(
            %window,
            input,
            editing = %composed.editing,
            output = %composed.output,
            "key applied"
        );

        let mut replacement = composed.output.clone();
        replacement.push_str(&composed.editing);
        self.buffer.replace_editing_window(&replacement);
        composed
    }

    /// Undo one stroke before the caret and return the new editing tail.
    pub fn backspace(&mut self) -> String {
        let window = self.buffer.editing_window().to_owned();
        if window.is_empty() {
            return String::new();
        }
        let editing = self.automata.input_backspace(&window);
        trace!(%window, %editing, "backspace applied");
        self.buffer.replace_editing_window(&editing);
        editing
    }

    /// Clear the field.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

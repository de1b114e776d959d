//! Keyboard front end: layout mapping on top of a `HangulSession`.

use hangul_core::{Automata, Composed, Config, HangulSession};
use tracing::debug;

use crate::config::HangulConfig;
use crate::layout::KeyboardLayout;

/// Build the automaton a layout needs from the shared configuration.
pub fn create_automata(layout: KeyboardLayout, config: &Config) -> Automata {
    Automata::from_config(config, layout.policy())
}

/// A text field fed by keys of one layout.
#[derive(Debug, Clone)]
pub struct Keyboard {
    layout: KeyboardLayout,
    session: HangulSession<Automata>,
    backspace_key: Option<char>,
}

impl Keyboard {
    pub fn new(layout: KeyboardLayout, config: &Config) -> Self {
        Self {
            layout,
            session: HangulSession::new(create_automata(layout, config)),
            backspace_key: None,
        }
    }

    /// Treat `key` as backspace in `press` and `type_keys`.
    ///
    /// No key is reserved by default, so every character reaches the layout.
    pub fn with_backspace_key(mut self, key: char) -> Self {
        self.backspace_key = Some(key);
        self
    }

    pub fn backspace_key(&self) -> Option<char> {
        self.backspace_key
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub fn session(&self) -> &HangulSession<Automata> {
        &self.session
    }

    pub fn text(&self) -> &str {
        self.session.text()
    }

    /// Press one physical key.
    pub fn press(&mut self, key: char) -> Composed {
        if self.backspace_key == Some(key) {
            let editing = self.session.backspace();
            return Composed {
                editing,
                output: String::new(),
            };
        }
        let input = self.layout.translate(key);
        debug!(layout = self.layout.name(), %key, %input, "key pressed");
        self.session.input_key(&input)
    }

    pub fn backspace(&mut self) -> String {
        self.session.backspace()
    }

    /// Press every key of `keys` in order and return the field text.
    pub fn type_keys(&mut self, keys: &str) -> &str {
        for key in keys.chars() {
            self.press(key);
        }
        self.text()
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }
}

/// Validate `config` and build a keyboard for its layout.
pub fn create_keyboard(config: &HangulConfig) -> anyhow::Result<Keyboard> {
    config.validate()?;
    Ok(Keyboard::new(config.layout, config.base()))
}

/// Two-set (KS X 5002) keyboard with default settings.
pub fn create_keyboard_two_set() -> Keyboard {
    Keyboard::new(KeyboardLayout::TwoSet, &Config::default())
}

/// Cheonjiin keypad with default settings.
pub fn create_keyboard_cheonjiin() -> Keyboard {
    Keyboard::new(KeyboardLayout::Cheonjiin, &Config::default())
}

//! # libhangul
//!
//! Korean Hangul input method built on hangul-core: keyboard layouts,
//! layout-aware configuration and ready-made keyboards.

pub mod config;
pub mod engine;
pub mod layout;

// Re-export the composition core
pub use hangul_core::*;

pub use config::HangulConfig;
pub use engine::{
    create_automata, create_keyboard, create_keyboard_cheonjiin, create_keyboard_two_set,
    Keyboard,
};
pub use layout::KeyboardLayout;

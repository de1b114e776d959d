//! Keyboard layouts.
//!
//! A layout turns a physical key into the candidate set the automaton
//! receives and picks the combination policy that fits how that layout
//! builds vowels and clusters.

use hangul_core::{CombinePolicy, DOT};
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Supported Hangul keyboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyboardLayout {
    /// Dubeolsik, the standard two-set layout (KS X 5002)
    #[default]
    TwoSet,
    /// Cheonjiin 3x4 keypad: three vowel strokes, multi-tap consonants
    Cheonjiin,
}

/// QWERTY key → jamo for the two-set layout. Shift only changes the five
/// tense consonants and ㅒ/ㅖ; other capitals type the same jamo.
static TWO_SET_KEYS: phf::Map<char, &'static str> = phf_map! {
    'q' => "ㅂ", 'w' => "ㅈ", 'e' => "ㄷ", 'r' => "ㄱ", 't' => "ㅅ",
    'y' => "ㅛ", 'u' => "ㅕ", 'i' => "ㅑ", 'o' => "ㅐ", 'p' => "ㅔ",
    'a' => "ㅁ", 's' => "ㄴ", 'd' => "ㅇ", 'f' => "ㄹ", 'g' => "ㅎ",
    'h' => "ㅗ", 'j' => "ㅓ", 'k' => "ㅏ", 'l' => "ㅣ",
    'z' => "ㅋ", 'x' => "ㅌ", 'c' => "ㅊ", 'v' => "ㅍ", 'b' => "ㅠ",
    'n' => "ㅜ", 'm' => "ㅡ",
    'Q' => "ㅃ", 'W' => "ㅉ", 'E' => "ㄸ", 'R' => "ㄲ", 'T' => "ㅆ",
    'Y' => "ㅛ", 'U' => "ㅕ", 'I' => "ㅑ", 'O' => "ㅒ", 'P' => "ㅖ",
    'A' => "ㅁ", 'S' => "ㄴ", 'D' => "ㅇ", 'F' => "ㄹ", 'G' => "ㅎ",
    'H' => "ㅗ", 'J' => "ㅓ", 'K' => "ㅏ", 'L' => "ㅣ",
    'Z' => "ㅋ", 'X' => "ㅌ", 'C' => "ㅊ", 'V' => "ㅍ", 'B' => "ㅠ",
    'N' => "ㅜ", 'M' => "ㅡ",
};

// Key 2 is the single-dot stroke (U+119E).
static CHEONJIIN_KEYS: phf::Map<char, &'static str> = phf_map! {
    '1' => "ㅣ",
    '2' => "\u{119E}",
    '3' => "ㅡ",
    '4' => "ㄱㅋㄲ",
    '5' => "ㄴㄹ",
    '6' => "ㄷㅌㄸ",
    '7' => "ㅂㅍㅃ",
    '8' => "ㅅㅎㅆ",
    '9' => "ㅈㅊㅉ",
    '0' => "ㅇㅁ",
};

impl KeyboardLayout {
    pub fn name(&self) -> &'static str {
        match self {
            KeyboardLayout::TwoSet => "two-set",
            KeyboardLayout::Cheonjiin => "cheonjiin",
        }
    }

    /// Combination policy used with this layout.
    pub fn policy(&self) -> CombinePolicy {
        match self {
            KeyboardLayout::TwoSet => CombinePolicy::ks_x_5002(),
            KeyboardLayout::Cheonjiin => CombinePolicy::permissive(),
        }
    }

    /// Candidate set for `key`, or `None` when the key is not part of the layout.
    pub fn map_key(&self, key: char) -> Option<&'static str> {
        self.keys().get(&key).copied()
    }

    /// Candidate set for `key`; unmapped keys are passed through as themselves.
    pub fn translate(&self, key: char) -> String {
        match self.map_key(key) {
            Some(set) => set.to_string(),
            None => key.to_string(),
        }
    }

    /// Whether this layout builds vowels from strokes.
    pub fn uses_strokes(&self) -> bool {
        self.keys().values().any(|set| set.contains(DOT))
    }

    fn keys(&self) -> &'static phf::Map<char, &'static str> {
        match self {
            KeyboardLayout::TwoSet => &TWO_SET_KEYS,
            KeyboardLayout::Cheonjiin => &CHEONJIIN_KEYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_set_maps_shifted_consonants() {
        let layout = KeyboardLayout::TwoSet;
        assert_eq!(layout.map_key('r'), Some("ㄱ"));
        assert_eq!(layout.map_key('R'), Some("ㄲ"));
        assert_eq!(layout.map_key('o'), Some("ㅐ"));
        assert_eq!(layout.map_key('O'), Some("ㅒ"));
        assert_eq!(layout.map_key('K'), Some("ㅏ"));
        assert_eq!(layout.map_key('1'), None);
        assert_eq!(layout.translate('!'), "!");
    }

    #[test]
    fn two_set_covers_every_letter() {
        for key in ('a'..='z').chain('A'..='Z') {
            assert!(KeyboardLayout::TwoSet.map_key(key).is_some(), "{} unmapped", key);
        }
    }

    #[test]
    fn cheonjiin_keys_are_candidate_sets() {
        let layout = KeyboardLayout::Cheonjiin;
        assert_eq!(layout.map_key('4'), Some("ㄱㅋㄲ"));
        assert_eq!(layout.map_key('2'), Some("\u{119E}"));
        assert_eq!(layout.map_key('a'), None);
        assert!(layout.uses_strokes());
        assert!(!KeyboardLayout::TwoSet.uses_strokes());
    }

    #[test]
    fn layout_selects_policy() {
        assert_eq!(KeyboardLayout::TwoSet.policy().name(), "ks-x-5002");
        assert_eq!(KeyboardLayout::Cheonjiin.policy().name(), "standard");
    }

    #[test]
    fn layout_names_match_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            layout: KeyboardLayout,
        }
        for layout in [KeyboardLayout::TwoSet, KeyboardLayout::Cheonjiin] {
            let text = format!("layout = \"{}\"", layout.name());
            let parsed: Wrapper = toml::from_str(&text).unwrap();
            assert_eq!(parsed.layout, layout);
        }
    }
}

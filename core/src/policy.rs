//! Layout-specific combination policy.
//!
//! Every layout shares the same tables; a layout only narrows which pairs
//! may fuse. The policy is a plain value holding a rejection predicate that
//! is consulted before the table lookup, so a new layout is a new
//! `CombinePolicy` value rather than a new automaton type.

use crate::jamo::is_stroke;
use crate::tables;

/// Combination policy for one keyboard layout.
#[derive(Debug, Clone, Copy)]
pub struct CombinePolicy {
    name: &'static str,
    reject: fn(char, char) -> bool,
}

impl CombinePolicy {
    /// Create a policy from a name and a predicate returning `true` for pairs
    /// that must not combine on this layout.
    pub const fn new(name: &'static str, reject: fn(char, char) -> bool) -> Self {
        Self { name, reject }
    }

    /// Accept every pair the combine table knows (multi-tap keypads).
    pub const fn permissive() -> Self {
        Self::new("standard", reject_nothing)
    }

    /// Two-set physical keyboard (KS X 5002).
    ///
    /// The layout has no stroke key, and ㅐ ㅒ ㅔ ㅖ ㅙ ㅝ ㅞ each have their
    /// own key or are built from a different pair, so `vowel + ㅣ` chains
    /// used by keypads are rejected.
    pub const fn ks_x_5002() -> Self {
        Self::new("ks-x-5002", reject_ks_x_5002)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this policy forbids `first + second` regardless of the table.
    pub fn rejects(&self, first: char, second: char) -> bool {
        (self.reject)(first, second)
    }

    /// Fuse two jamo if the layout allows it and the table has an entry.
    pub fn try_combine(&self, first: char, second: char) -> Option<char> {
        if self.rejects(first, second) {
            return None;
        }
        tables::combine(first, second)
    }

    /// Split a fused jamo. Breaking is never restricted by layout.
    pub fn try_break(&self, fused: char) -> Option<(char, char)> {
        tables::break_apart(fused)
    }
}

impl Default for CombinePolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

fn reject_nothing(_first: char, _second: char) -> bool {
    false
}

fn reject_ks_x_5002(first: char, second: char) -> bool {
    is_stroke(first)
        || is_stroke(second)
        || (second == 'ㅣ' && matches!(first, 'ㅏ' | 'ㅑ' | 'ㅓ' | 'ㅕ' | 'ㅘ' | 'ㅠ' | 'ㅝ'))
}

//! Fixed jamo combination and break tables.
//!
//! The break table maps a fused jamo (final cluster or diphthong) to the two
//! jamo it was built from. The combine table is its inverse plus the
//! one-way fusions used by multi-tap keypads, which have no break entry.
//! Both are built once per process and never mutated.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use phf::phf_map;

use crate::jamo::{DOT, DOUBLE_DOT};

/// Ordered pair of jamo used as a combine-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JamoPair(pub char, pub char);

static BREAK_TABLE: phf::Map<char, (char, char)> = phf_map! {
    'ㄳ' => ('ㄱ', 'ㅅ'),
    'ㄵ' => ('ㄴ', 'ㅈ'),
    'ㄶ' => ('ㄴ', 'ㅎ'),
    'ㄺ' => ('ㄹ', 'ㄱ'),
    'ㄻ' => ('ㄹ', 'ㅁ'),
    'ㄼ' => ('ㄹ', 'ㅂ'),
    'ㄽ' => ('ㄹ', 'ㅅ'),
    'ㄾ' => ('ㄹ', 'ㅌ'),
    'ㄿ' => ('ㄹ', 'ㅍ'),
    'ㅀ' => ('ㄹ', 'ㅎ'),
    'ㅄ' => ('ㅂ', 'ㅅ'),
    'ㅘ' => ('ㅗ', 'ㅏ'),
    'ㅙ' => ('ㅗ', 'ㅐ'),
    'ㅚ' => ('ㅗ', 'ㅣ'),
    'ㅝ' => ('ㅜ', 'ㅓ'),
    'ㅞ' => ('ㅜ', 'ㅔ'),
    'ㅟ' => ('ㅜ', 'ㅣ'),
    'ㅢ' => ('ㅡ', 'ㅣ'),
};

/// One-way fusions: stroke taps and vowel extensions keyed one tap at a time.
const ONE_WAY_FUSIONS: [(char, char, char); 17] = [
    (DOT, DOT, DOUBLE_DOT),
    ('ㅣ', DOT, 'ㅏ'),
    ('ㅏ', DOT, 'ㅑ'),
    (DOT, 'ㅣ', 'ㅓ'),
    (DOUBLE_DOT, 'ㅣ', 'ㅕ'),
    (DOT, 'ㅡ', 'ㅗ'),
    ('ㅚ', DOT, 'ㅘ'),
    (DOUBLE_DOT, 'ㅡ', 'ㅛ'),
    ('ㅡ', DOT, 'ㅜ'),
    ('ㅜ', DOT, 'ㅠ'),
    ('ㅏ', 'ㅣ', 'ㅐ'),
    ('ㅑ', 'ㅣ', 'ㅒ'),
    ('ㅓ', 'ㅣ', 'ㅔ'),
    ('ㅕ', 'ㅣ', 'ㅖ'),
    ('ㅘ', 'ㅣ', 'ㅙ'),
    ('ㅠ', 'ㅣ', 'ㅝ'),
    ('ㅝ', 'ㅣ', 'ㅞ'),
];

static COMBINE_TABLE: Lazy<AHashMap<JamoPair, char>> = Lazy::new(|| {
    let mut map = AHashMap::with_capacity(BREAK_TABLE.len() + ONE_WAY_FUSIONS.len());
    for (&fused, &(first, second)) in BREAK_TABLE.entries() {
        map.insert(JamoPair(first, second), fused);
    }
    for &(first, second, fused) in ONE_WAY_FUSIONS.iter() {
        map.insert(JamoPair(first, second), fused);
    }
    map
});

/// Look up the fusion of `first` followed by `second`.
pub fn combine(first: char, second: char) -> Option<char> {
    COMBINE_TABLE.get(&JamoPair(first, second)).copied()
}

/// Split a fused jamo into its two constituents.
pub fn break_apart(fused: char) -> Option<(char, char)> {
    BREAK_TABLE.get(&fused).copied()
}

/// Number of entries in the combine table.
pub fn combine_table_len() -> usize {
    COMBINE_TABLE.len()
}

//! Jamo classification and syllable encoding.
//!
//! Precomposed syllables (U+AC00..U+D7A3) are computed from an initial, a
//! medial and an optional final:
//!
//! ```text
//! code = 0xAC00 + FINAL_COUNT * (MEDIAL_COUNT * initial + medial) + final
//! ```
//!
//! Bare jamo are the compatibility letters (U+3131..U+3163) plus the two
//! stroke primitives used by 3-key vowel keypads to build vowels one tap at
//! a time.

/// Single-dot stroke primitive (arae-a).
pub const DOT: char = '\u{119E}';
/// Two single-dot strokes fused together.
pub const DOUBLE_DOT: char = '\u{11A2}';

const SYLLABLE_START: u32 = 0xAC00;
const SYLLABLE_END: u32 = 0xD7A3;
const CONSONANT_START: u32 = 0x3131;
const CONSONANT_END: u32 = 0x314E;
const MEDIAL_START: u32 = 0x314F;
const MEDIAL_END: u32 = 0x3163;

const MEDIAL_COUNT: u32 = MEDIAL_END - MEDIAL_START + 1;
// Includes the "no final" slot at index 0.
const FINAL_COUNT: u32 = FINALS.len() as u32 + 1;
const INITIAL_UNIT: u32 = MEDIAL_COUNT * FINAL_COUNT;

/// Consonants that may open a syllable, in encoding order.
pub const INITIALS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

/// Consonants and clusters that may close a syllable, in encoding order
/// (index 0 of the encoding is "no final" and is not listed).
pub const FINALS: [char; 27] = [
    'ㄱ', 'ㄲ', 'ㄳ', 'ㄴ', 'ㄵ', 'ㄶ', 'ㄷ', 'ㄹ', 'ㄺ', 'ㄻ', 'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ', 'ㅁ',
    'ㅂ', 'ㅄ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// The single classification every code point falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JamoKind {
    /// Compatibility consonant or consonant cluster (ㄱ..ㅎ)
    Consonant,
    /// Compatibility vowel (ㅏ..ㅣ)
    Vowel,
    /// Precomposed syllable block (가..힣)
    Syllable,
    /// Multi-tap stroke primitive (`DOT` or `DOUBLE_DOT`)
    Stroke,
    /// Anything else; passed through literally
    Other,
}

/// Classify a code point.
pub fn classify(c: char) -> JamoKind {
    match c as u32 {
        CONSONANT_START..=CONSONANT_END => JamoKind::Consonant,
        MEDIAL_START..=MEDIAL_END => JamoKind::Vowel,
        SYLLABLE_START..=SYLLABLE_END => JamoKind::Syllable,
        _ if c == DOT || c == DOUBLE_DOT => JamoKind::Stroke,
        _ => JamoKind::Other,
    }
}

pub fn is_consonant(c: char) -> bool {
    classify(c) == JamoKind::Consonant
}

pub fn is_vowel(c: char) -> bool {
    classify(c) == JamoKind::Vowel
}

pub fn is_syllable(c: char) -> bool {
    classify(c) == JamoKind::Syllable
}

pub fn is_stroke(c: char) -> bool {
    classify(c) == JamoKind::Stroke
}

/// True for consonants, vowels, syllables and stroke primitives.
pub fn is_hangul(c: char) -> bool {
    classify(c) != JamoKind::Other
}

pub fn can_be_initial(c: char) -> bool {
    initial_index(c).is_some()
}

pub fn can_be_final(c: char) -> bool {
    final_index(c).is_some()
}

fn initial_index(c: char) -> Option<u32> {
    INITIALS.iter().position(|&x| x == c).map(|i| i as u32)
}

fn medial_index(c: char) -> Option<u32> {
    is_vowel(c).then(|| c as u32 - MEDIAL_START)
}

fn final_index(c: char) -> Option<u32> {
    FINALS.iter().position(|&x| x == c).map(|i| i as u32 + 1)
}

/// Decompose a character into its jamo parts.
///
/// - syllable: `[initial, medial]` or `[initial, medial, final]`
/// - bare consonant, vowel or stroke: `[c]`
/// - anything else: `None`
pub fn to_parts(c: char) -> Option<Vec<char>> {
    match classify(c) {
        JamoKind::Syllable => {
            let code = c as u32 - SYLLABLE_START;
            let initial = INITIALS[(code / INITIAL_UNIT) as usize];
            let medial = char::from_u32(MEDIAL_START + code % INITIAL_UNIT / FINAL_COUNT)?;
            match code % FINAL_COUNT {
                0 => Some(vec![initial, medial]),
                f => Some(vec![initial, medial, FINALS[f as usize - 1]]),
            }
        }
        JamoKind::Consonant | JamoKind::Vowel | JamoKind::Stroke => Some(vec![c]),
        JamoKind::Other => None,
    }
}

/// Compose 1..=3 parts into a single character.
///
/// One part is returned unchanged. Two or three parts compose only when the
/// first can be an initial, the second is a vowel and the optional third can
/// be a final; otherwise `None`.
pub fn from_parts(parts: &[char]) -> Option<char> {
    match *parts {
        [single] => Some(single),
        [initial, medial] => compose(initial, medial, None),
        [initial, medial, last] => compose(initial, medial, Some(last)),
        _ => None,
    }
}

fn compose(initial: char, medial: char, last: Option<char>) -> Option<char> {
    let initial = initial_index(initial)?;
    let medial = medial_index(medial)?;
    let last = match last {
        Some(c) => final_index(c)?,
        None => 0,
    };
    char::from_u32(SYLLABLE_START + FINAL_COUNT * (MEDIAL_COUNT * initial + medial) + last)
}

/// Render parts as text, composing as much as possible.
///
/// When the whole slice does not compose, the longest composable prefix is
/// rendered and the remaining parts follow as bare jamo, e.g.
/// `[ㄱ, ㅏ, ㄸ]` renders as `"가ㄸ"`.
pub fn render_parts(parts: &[char]) -> String {
    if let Some(c) = from_parts(parts) {
        return c.to_string();
    }
    match parts.split_last() {
        Some((&last, head)) if !head.is_empty() => {
            let mut rendered = render_parts(head);
            rendered.push(last);
            rendered
        }
        _ => parts.iter().collect(),
    }
}

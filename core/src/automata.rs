//! Hangul composition automaton.
//!
//! The automaton is stateless with respect to text: the host passes the
//! characters still open to editing (at most the two before the caret) and
//! receives the new editing tail plus any text that became final. The only
//! state kept between calls is the replace-cycle timer.
//!
//! Composition never fails. When parts cannot be fused into a syllable they
//! are rendered side by side as bare jamo.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::jamo::{
    can_be_initial, from_parts, is_consonant, is_hangul, is_stroke, is_syllable, is_vowel,
    render_parts, to_parts,
};
use crate::policy::CombinePolicy;
use crate::replace::{CycleGuard, ReplaceTimer, DEFAULT_REPLACE_TIMEOUT};
use crate::Config;

/// Input sentinel for backspace.
pub const BACKSPACE: char = '\u{8}';
/// Input sentinel that ends a live replace cycle without inserting anything.
pub const CANCEL: char = ' ';

/// Result of one keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Composed {
    /// Characters still open to editing
    pub editing: String,
    /// Characters that can no longer change
    pub output: String,
}

impl Composed {
    fn unchanged(editing: &str) -> Self {
        Self {
            editing: editing.to_owned(),
            output: String::new(),
        }
    }

    fn new(editing: impl Into<String>, output: String) -> Self {
        Self {
            editing: editing.into(),
            output,
        }
    }
}

/// Keystroke interface consumed by host adapters.
pub trait HangulAutomata {
    /// Apply one logical keypress.
    ///
    /// `input` holds the interchangeable jamo of the key in cycle order
    /// (e.g. `"ㄱㅋㄲ"`); only the first one is typed unless the key is
    /// pressed again within the replace timeout.
    fn input_character(&self, editing: &str, input: &str) -> Composed;

    /// Undo one stroke of composition.
    fn input_backspace(&self, editing: &str) -> String {
        self.input_character(editing, BACKSPACE.encode_utf8(&mut [0; 4])).editing
    }
}

/// Table-driven automaton parameterized by a layout policy.
#[derive(Debug, Clone)]
pub struct Automata {
    policy: CombinePolicy,
    timer: ReplaceTimer,
}

impl Automata {
    pub fn new(policy: CombinePolicy) -> Self {
        Self::with_timeout(policy, DEFAULT_REPLACE_TIMEOUT)
    }

    /// A zero `timeout` is raised to `MIN_REPLACE_TIMEOUT`.
    pub fn with_timeout(policy: CombinePolicy, timeout: Duration) -> Self {
        Self {
            policy,
            timer: ReplaceTimer::new(timeout),
        }
    }

    pub fn from_config(config: &Config, policy: CombinePolicy) -> Self {
        Self::with_timeout(policy, config.replace_input_timeout())
    }

    pub fn policy(&self) -> &CombinePolicy {
        &self.policy
    }

    pub fn replace_input_timeout(&self) -> Duration {
        self.timer.lock().timeout()
    }

    /// Change the replace window. A cycle already running keeps its deadline;
    /// zero is raised to `MIN_REPLACE_TIMEOUT`.
    pub fn set_replace_input_timeout(&self, timeout: Duration) {
        self.timer.lock().set_timeout(timeout);
    }

    /// Whether a replace cycle is currently live.
    pub fn is_replace_pending(&self) -> bool {
        self.timer.lock().is_active()
    }

    /// End the live replace cycle, if any.
    pub fn cancel_replace(&self) {
        self.timer.lock().cancel();
    }

    pub fn try_combine(&self, first: char, second: char) -> Option<char> {
        self.policy.try_combine(first, second)
    }

    pub fn try_break(&self, fused: char) -> Option<(char, char)> {
        self.policy.try_break(fused)
    }

    fn compose(&self, cycle: &CycleGuard<'_>, editing: &str, input: &str, key: char) -> Composed {
        let mut chars: Vec<char> = editing.chars().collect();
        let mut output = String::new();
        let mut key = key;
        let mut replaced = false;

        if chars.is_empty() {
            return Composed::new(key, output);
        }

        if chars.len() > 1 {
            // Only the last two characters can still change.
            let settled = chars.len() - 2;
            output.extend(chars.drain(..settled));
            let (head, last) = (chars[0], chars[1]);

            match is_stroke(last).then(|| self.policy.try_combine(last, key)).flatten() {
                Some(fused) if is_stroke(fused) => {
                    debug!(%head, %fused, "stroke fusion");
                    return Composed::new(render_parts(&[head, fused]), output);
                }
                Some(fused) => {
                    debug!(%head, %fused, "stroke fusion completes vowel");
                    chars.truncate(1);
                    key = fused;
                }
                None => {
                    let swap = cycle
                        .next_in_cycle(last, input)
                        .or_else(|| self.policy.try_combine(last, key));
                    if let Some(next) = swap {
                        debug!(%last, %next, "replace trailing jamo");
                        replaced = true;
                        key = next;
                        chars.truncate(1);
                        if !is_syllable(head)
                            && !(can_be_initial(head) && is_vowel(key))
                            && self.policy.try_combine(head, key).is_none()
                        {
                            return Composed::new(format!("{head}{key}"), output);
                        }
                    } else {
                        output.push(chars.remove(0));
                    }
                }
            }
        }

        let current = chars[0];
        let Some(mut parts) = to_parts(current) else {
            output.push(current);
            return Composed::new(key, output);
        };
        let last_index = parts.len() - 1;
        let last_part = parts[last_index];

        let cycled = if replaced {
            None
        } else {
            cycle.next_in_cycle(last_part, input)
        };
        if let Some(next) = cycled.or_else(|| self.policy.try_combine(last_part, key)) {
            debug!(%current, %last_part, %next, "combine trailing part");
            parts[last_index] = next;
            return Composed::new(render_parts(&parts), output);
        }

        let cluster = is_consonant(last_part)
            .then(|| self.policy.try_break(last_part))
            .flatten();
        if let Some((first, second)) = cluster {
            if can_be_initial(second) && is_vowel(key) {
                debug!(%current, %second, %key, "break cluster into next syllable");
                parts[last_index] = first;
                output.push_str(&render_parts(&parts));
                return Composed::new(render_parts(&[second, key]), output);
            }
            let cycled = if replaced {
                None
            } else {
                cycle.next_in_cycle(second, input)
            };
            if let Some(next) = cycled.or_else(|| self.policy.try_combine(second, key)) {
                if let Some(regrouped) = self.policy.try_combine(first, next) {
                    debug!(%current, %regrouped, "regroup cluster");
                    parts[last_index] = regrouped;
                    return Composed::new(render_parts(&parts), output);
                }
                if parts.len() == 3 {
                    parts[last_index] = first;
                    output.push_str(&render_parts(&parts));
                    return Composed::new(next, output);
                }
            }
        } else if is_stroke(key) {
            return Composed::new(format!("{current}{key}"), output);
        } else if parts.len() > 2 && can_be_initial(last_part) && is_vowel(key) {
            debug!(%current, %last_part, %key, "final moves to next syllable");
            parts.truncate(last_index);
            output.push_str(&render_parts(&parts));
            return Composed::new(render_parts(&[last_part, key]), output);
        }

        parts.push(key);
        match from_parts(&parts) {
            Some(syllable) => Composed::new(syllable, output),
            None => {
                debug!(%current, %key, "start new syllable");
                output.push(current);
                Composed::new(key, output)
            }
        }
    }

    fn backspace(&self, editing: &str) -> String {
        let mut rest: Vec<char> = editing.chars().collect();
        let Some(last) = rest.pop() else {
            return String::new();
        };

        let tail = match to_parts(last).as_deref() {
            Some(&[initial, medial]) => self.drop_medial(&mut rest, initial, medial),
            Some(&[initial, medial, last_part]) => match self.policy.try_break(last_part) {
                Some((first, _)) => render_parts(&[initial, medial, first]),
                None => render_parts(&[initial, medial]),
            },
            _ => match self.policy.try_break(last) {
                Some((first, _)) => self.unfuse(&mut rest, first),
                None => String::new(),
            },
        };

        let mut result: String = rest.into_iter().collect();
        result.push_str(&tail);
        result
    }

    /// Backspace over a syllable without a final.
    fn drop_medial(&self, rest: &mut Vec<char>, initial: char, medial: char) -> String {
        if let Some((first, _)) = self.policy.try_break(medial) {
            return render_parts(&[initial, first]);
        }
        // The bare initial may fold back into the previous syllable's final.
        if let Some(mut previous) = rest.last().and_then(|&c| to_parts(c)) {
            if previous.len() == 3 {
                let regrouped = self
                    .policy
                    .try_combine(previous[2], initial)
                    .filter(|&c| self.policy.try_break(c).is_some());
                if let Some(cluster) = regrouped {
                    debug!(%initial, %cluster, "initial rejoins previous final");
                    previous[2] = cluster;
                    rest.pop();
                    return render_parts(&previous);
                }
            }
        }
        initial.to_string()
    }

    /// Backspace over a bare fused jamo, keeping its first constituent.
    fn unfuse(&self, rest: &mut Vec<char>, first: char) -> String {
        let Some(previous) = rest.last().and_then(|&c| to_parts(c)) else {
            return first.to_string();
        };
        let &[initial, medial, last_part] = previous.as_slice() else {
            return first.to_string();
        };

        if let Some(cluster) = self.policy.try_combine(last_part, first) {
            if self.policy.try_break(cluster).is_some() {
                debug!(%first, %cluster, "constituent rejoins previous final");
                rest.pop();
                return render_parts(&[initial, medial, cluster]);
            }
            return first.to_string();
        }

        if is_vowel(first) {
            if can_be_initial(last_part) {
                debug!(%last_part, %first, "previous final opens new syllable");
                rest.pop();
                return render_parts(&[initial, medial]) + &render_parts(&[last_part, first]);
            }
            if let Some((kept, moved)) = self
                .policy
                .try_break(last_part)
                .filter(|&(_, moved)| can_be_initial(moved))
            {
                debug!(%last_part, %first, "previous cluster splits into new syllable");
                rest.pop();
                return render_parts(&[initial, medial, kept]) + &render_parts(&[moved, first]);
            }
        }
        first.to_string()
    }
}

impl Default for Automata {
    fn default() -> Self {
        Self::new(CombinePolicy::permissive())
    }
}

impl HangulAutomata for Automata {
    fn input_character(&self, editing: &str, input: &str) -> Composed {
        let mut cycle = self.timer.lock();

        let Some(key) = input.chars().next() else {
            return Composed::unchanged(editing);
        };

        if key == CANCEL && cycle.is_active() {
            cycle.cancel();
            return Composed::unchanged(editing);
        }

        if key == BACKSPACE {
            return Composed::new(self.backspace(editing), String::new());
        }

        let composed = if is_hangul(key) {
            self.compose(&cycle, editing, input, key)
        } else {
            let mut output = editing.to_owned();
            output.push(key);
            Composed::new(String::new(), output)
        };

        if input.chars().nth(1).is_some() {
            cycle.arm(input);
        }

        composed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jamo::{DOT, DOUBLE_DOT};
    use crate::replace::MIN_REPLACE_TIMEOUT;
    use std::thread;

    fn standard() -> Automata {
        Automata::with_timeout(CombinePolicy::permissive(), Duration::from_secs(5))
    }

    fn two_set() -> Automata {
        Automata::with_timeout(CombinePolicy::ks_x_5002(), Duration::from_secs(5))
    }

    fn step(automata: &Automata, editing: &str, input: &str) -> (String, String) {
        let composed = automata.input_character(editing, input);
        (composed.editing, composed.output)
    }

    #[test]
    fn sequential_compose() {
        let a = standard();
        assert_eq!(step(&a, "", "ㄱ"), ("ㄱ".into(), "".into()));
        assert_eq!(step(&a, "ㄱ", "ㅗ"), ("고".into(), "".into()));
        assert_eq!(step(&a, "고", "ㅇ"), ("공".into(), "".into()));
    }

    #[test]
    fn empty_input_is_noop() {
        let a = standard();
        assert_eq!(step(&a, "가", ""), ("가".into(), "".into()));
    }

    #[test]
    fn non_hangul_finalizes_editing() {
        let a = standard();
        assert_eq!(step(&a, "가", "a"), ("".into(), "가a".into()));
        assert_eq!(step(&a, "", "."), ("".into(), ".".into()));
        // without a live cycle a space is literal text
        assert_eq!(step(&a, "각", " "), ("".into(), "각 ".into()));
    }

    #[test]
    fn composition_matrix() {
        // (editing, key, expected editing, expected output)
        let cases: &[(&str, &str, &str, &str)] = &[
            // bare consonant tail
            ("ㄱ", "ㅏ", "가", ""),
            ("ㄱ", "ㄴ", "ㄴ", "ㄱ"),
            ("ㄱ", "ㅅ", "ㄳ", ""),
            ("ㄳ", "ㅏ", "사", "ㄱ"),
            ("ㄳ", "ㄴ", "ㄴ", "ㄳ"),
            // bare vowel tail
            ("ㅏ", "ㅣ", "ㅐ", ""),
            ("ㅏ", "ㄱ", "ㄱ", "ㅏ"),
            ("ㅗ", "ㅏ", "ㅘ", ""),
            // open syllable
            ("고", "ㅏ", "과", ""),
            ("가", "ㄱ", "각", ""),
            ("가", "ㄸ", "ㄸ", "가"),
            ("가", "ㅗ", "ㅗ", "가"),
            // closed syllable
            ("갈", "ㄱ", "갉", ""),
            ("각", "ㅅ", "갃", ""),
            ("공", "ㅏ", "아", "고"),
            ("각", "ㄴ", "ㄴ", "각"),
            // final cluster
            ("갉", "ㅏ", "가", "갈"),
            ("값", "ㅣ", "시", "갑"),
            ("갉", "ㄴ", "ㄴ", "갉"),
            // non-Hangul tail
            ("a", "ㄱ", "ㄱ", "a"),
            // multi-character editing
            ("가나다", "ㄹ", "달", "가나"),
            ("한국", "ㅏ", "가", "한구"),
            ("가ㄸ", "ㅏ", "따", "가"),
            ("가ㄱ", "ㅅ", "갃", ""),
            ("ㄴㄱ", "ㅅ", "ㄴㄳ", ""),
        ];
        let a = standard();
        for &(editing, key, expected_editing, expected_output) in cases {
            let composed = a.input_character(editing, key);
            assert_eq!(
                (composed.editing.as_str(), composed.output.as_str()),
                (expected_editing, expected_output),
                "{:?} + {:?}",
                editing,
                key
            );
        }
    }

    #[test]
    fn stroke_matrix() {
        let dot = DOT.to_string();
        let cases: Vec<(String, &str, String, &str)> = vec![
            ("ㄱ".into(), dot.as_str(), format!("ㄱ{DOT}"), ""),
            (format!("ㄱ{DOT}"), "ㅣ", "거".into(), ""),
            (format!("ㄱ{DOT}"), dot.as_str(), format!("ㄱ{DOUBLE_DOT}"), ""),
            (format!("ㄱ{DOUBLE_DOT}"), "ㅣ", "겨".into(), ""),
            (format!("ㄱ{DOT}"), "ㅡ", "고".into(), ""),
            (format!("ㄱ{DOUBLE_DOT}"), "ㅡ", "교".into(), ""),
            ("기".into(), dot.as_str(), "가".into(), ""),
            ("가".into(), dot.as_str(), "갸".into(), ""),
            ("그".into(), dot.as_str(), "구".into(), ""),
            ("구".into(), dot.as_str(), "규".into(), ""),
            ("규".into(), "ㅣ", "궈".into(), ""),
            ("궈".into(), "ㅣ", "궤".into(), ""),
            ("괴".into(), dot.as_str(), "과".into(), ""),
            ("과".into(), "ㅣ", "괘".into(), ""),
            ("각".into(), dot.as_str(), format!("각{DOT}"), ""),
            (format!("각{DOT}"), "ㅣ", "거".into(), "가"),
            (dot.clone(), "ㅣ", "ㅓ".into(), ""),
            (format!("ㄱ{DOT}"), "ㄴ", "ㄴ".into(), "ㄱ\u{119E}"),
        ];
        let a = standard();
        for (editing, key, expected_editing, expected_output) in cases {
            let composed = a.input_character(&editing, key);
            assert_eq!(composed.editing, expected_editing, "{:?} + {:?}", editing, key);
            assert_eq!(composed.output, expected_output, "{:?} + {:?}", editing, key);
        }
    }

    #[test]
    fn two_set_policy_changes_vowel_combination() {
        let a = two_set();
        assert_eq!(step(&a, "가", "ㅣ"), ("ㅣ".into(), "가".into()));
        assert_eq!(step(&a, "오", "ㅐ"), ("왜".into(), "".into()));
        assert_eq!(step(&a, "ㄱ", &DOT.to_string()), (format!("ㄱ{DOT}"), "".into()));
        // the stroke never fuses, so the next vowel starts fresh
        assert_eq!(step(&a, &format!("ㄱ{DOT}"), "ㅣ"), ("ㅣ".into(), format!("ㄱ{DOT}")));
    }

    #[test]
    fn backspace_matrix() {
        let cases: &[(&str, &str)] = &[
            ("", ""),
            ("ㄱ", ""),
            ("고", "ㄱ"),
            ("공", "고"),
            ("과", "고"),
            ("괘", "고"),
            ("갉", "갈"),
            ("값", "갑"),
            ("ㅘ", "ㅗ"),
            ("ㄳ", "ㄱ"),
            ("ㄱ\u{119E}", "ㄱ"),
            ("ㄱ\u{11A2}", "ㄱ"),
            ("a", ""),
            ("갈가", "갉"),
            ("각가", "각ㄱ"),
            ("각ㅘ", "가고"),
            ("갃ㅘ", "각소"),
            ("가ㅘ", "가ㅗ"),
            ("갈ㄳ", "갉"),
        ];
        let a = standard();
        for &(editing, expected) in cases {
            assert_eq!(a.input_backspace(editing), expected, "backspace {:?}", editing);
        }
    }

    #[test]
    fn backspace_undoes_simple_step() {
        let a = standard();
        let steps = [
            ("", "ㄱ"),
            ("ㄱ", "ㅗ"),
            ("고", "ㅇ"),
            ("고", "ㅏ"),
            ("가", "ㄱ"),
            ("갈", "ㄱ"),
            ("갈", "ㅂ"),
        ];
        for (editing, key) in steps {
            let composed = a.input_character(editing, key);
            assert!(composed.output.is_empty());
            assert_eq!(a.input_backspace(&composed.editing), editing, "{:?} + {:?}", editing, key);
        }
    }

    #[test]
    fn backspace_sentinel_produces_no_output() {
        let a = standard();
        let composed = a.input_character("공", "\u{8}");
        assert_eq!(composed, Composed::new("고", String::new()));
    }

    #[test]
    fn replace_cycle_rotates() {
        let a = standard();
        let mut editing = String::new();
        for expected in ["ㄱ", "ㅋ", "ㄲ", "ㄱ", "ㅋ"] {
            let composed = a.input_character(&editing, "ㄱㅋㄲ");
            assert_eq!(composed.output, "");
            assert_eq!(composed.editing, expected);
            editing = composed.editing;
        }
        assert!(a.is_replace_pending());
    }

    #[test]
    fn replace_cycle_in_final_position() {
        let a = standard();
        let mut editing = "가".to_string();
        for expected in ["갇", "같", "가ㄸ", "갇"] {
            let composed = a.input_character(&editing, "ㄷㅌㄸ");
            assert_eq!(composed.editing, expected);
            assert_eq!(composed.output, "");
            editing = composed.editing;
        }
    }

    #[test]
    fn replace_cycle_elapses() {
        let a = Automata::with_timeout(CombinePolicy::permissive(), Duration::from_millis(30));
        assert_eq!(step(&a, "", "ㄱㅋㄲ"), ("ㄱ".into(), "".into()));
        thread::sleep(Duration::from_millis(300));
        assert!(!a.is_replace_pending());
        assert_eq!(step(&a, "ㄱ", "ㄱㅋㄲ"), ("ㄱ".into(), "ㄱ".into()));
    }

    #[test]
    fn cancel_sentinel_during_cycle() {
        let a = standard();
        assert_eq!(step(&a, "", "ㄴㄹ"), ("ㄴ".into(), "".into()));
        assert_eq!(step(&a, "ㄴ", " "), ("ㄴ".into(), "".into()));
        assert!(!a.is_replace_pending());
        assert_eq!(step(&a, "ㄴ", "ㄴㄹ"), ("ㄴ".into(), "ㄴ".into()));
    }

    #[test]
    fn other_key_does_not_continue_cycle() {
        let a = standard();
        assert_eq!(step(&a, "", "ㄱㅋㄲ"), ("ㄱ".into(), "".into()));
        assert_eq!(step(&a, "ㄱ", "ㄴㄹ"), ("ㄴ".into(), "ㄱ".into()));
    }

    #[test]
    fn explicit_cancel_and_timeout_update() {
        let a = standard();
        a.input_character("", "ㅇㅁ");
        assert!(a.is_replace_pending());
        a.cancel_replace();
        assert!(!a.is_replace_pending());

        a.set_replace_input_timeout(Duration::from_millis(250));
        assert_eq!(a.replace_input_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn zero_timeout_is_raised_to_minimum() {
        let a = Automata::with_timeout(CombinePolicy::permissive(), Duration::ZERO);
        assert_eq!(a.replace_input_timeout(), MIN_REPLACE_TIMEOUT);
        a.set_replace_input_timeout(Duration::from_millis(40));
        a.set_replace_input_timeout(Duration::ZERO);
        assert_eq!(a.replace_input_timeout(), MIN_REPLACE_TIMEOUT);
    }

    #[test]
    fn clones_keep_separate_cycles() {
        let original = standard();
        assert_eq!(step(&original, "", "ㄱㅋㄲ"), ("ㄱ".into(), "".into()));

        let copy = original.clone();
        assert!(!copy.is_replace_pending());
        assert_eq!(copy.replace_input_timeout(), Duration::from_secs(5));
        // the copy never armed, so the same key starts a new jamo there
        assert_eq!(step(&copy, "ㄱ", "ㄱㅋㄲ"), ("ㄱ".into(), "ㄱ".into()));
        assert_eq!(step(&original, "ㄱ", "ㄱㅋㄲ"), ("ㅋ".into(), "".into()));
    }

    #[test]
    fn automata_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Automata>();
    }
}

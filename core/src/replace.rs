//! Replace-cycle timer for multi-choice keys.
//!
//! A key such as `ㄱㅋㄲ` offers several jamo; pressing it again within the
//! timeout rotates the trailing jamo through that set. The timer is a
//! delayed task on its own thread holding a generation token: arming or
//! cancelling bumps the generation, so a superseded task wakes up, sees a
//! stale token and leaves the state alone.
//!
//! The automaton holds the same mutex for the whole of each keystroke, so an
//! elapsing timer can never interleave with a composition step.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{trace, warn};

/// Default replace-cycle window.
pub const DEFAULT_REPLACE_TIMEOUT: Duration = Duration::from_millis(600);
/// Shortest accepted window; shorter timeouts are raised to this.
pub const MIN_REPLACE_TIMEOUT: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct CycleState {
    generation: u64,
    /// Candidate set of the key that armed the live cycle.
    active: Option<String>,
    timeout: Duration,
}

/// Cycle state plus the delayed task that clears it.
///
/// Cloning yields an independent timer with the same timeout and no live
/// cycle; only the delayed task shares state with its timer.
#[derive(Debug)]
pub struct ReplaceTimer {
    shared: Arc<Mutex<CycleState>>,
}

impl ReplaceTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(CycleState {
                generation: 0,
                active: None,
                timeout: timeout.max(MIN_REPLACE_TIMEOUT),
            })),
        }
    }

    /// Acquire the cycle lock. Hold the guard for a whole keystroke.
    pub fn lock(&self) -> CycleGuard<'_> {
        CycleGuard {
            state: self.shared.lock().unwrap_or_else(PoisonError::into_inner),
            shared: &self.shared,
        }
    }
}

impl Clone for ReplaceTimer {
    fn clone(&self) -> Self {
        Self::new(self.lock().timeout())
    }
}

impl Default for ReplaceTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REPLACE_TIMEOUT)
    }
}

/// Exclusive access to the cycle state for the duration of one keystroke.
pub struct CycleGuard<'a> {
    state: MutexGuard<'a, CycleState>,
    shared: &'a Arc<Mutex<CycleState>>,
}

impl CycleGuard<'_> {
    pub fn is_active(&self) -> bool {
        self.state.active.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.state.timeout
    }

    /// Change the window; zero is raised to `MIN_REPLACE_TIMEOUT`.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.state.timeout = timeout.max(MIN_REPLACE_TIMEOUT);
    }

    /// Next jamo after `current` in `input`, when `input` is the key that
    /// armed the live cycle and `current` belongs to it.
    pub fn next_in_cycle(&self, current: char, input: &str) -> Option<char> {
        if self.state.active.as_deref() != Some(input) {
            return None;
        }
        let choices: Vec<char> = input.chars().collect();
        if choices.len() < 2 {
            return None;
        }
        let index = choices.iter().position(|&c| c == current)?;
        Some(choices[(index + 1) % choices.len()])
    }

    /// Cancel any pending cycle and start a new one for `input`.
    pub fn arm(&mut self, input: &str) {
        self.state.generation = self.state.generation.wrapping_add(1);
        self.state.active = Some(input.to_owned());

        let token = self.state.generation;
        let timeout = self.state.timeout;
        let shared = Arc::clone(self.shared);
        trace!(token, ?timeout, input, "replace cycle armed");

        let spawned = thread::Builder::new()
            .name("hangul-replace-timer".to_string())
            .spawn(move || {
                thread::sleep(timeout);
                let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if state.generation == token && state.active.is_some() {
                    state.active = None;
                    trace!(token, "replace cycle elapsed");
                }
            });

        if let Err(err) = spawned {
            // Without a timer the cycle would never close.
            warn!(%err, "failed to spawn replace timer; cycle disabled");
            self.state.active = None;
        }
    }

    /// Cancel the pending cycle without starting a new one.
    pub fn cancel(&mut self) {
        if self.state.active.take().is_some() {
            self.state.generation = self.state.generation.wrapping_add(1);
            trace!(token = self.state.generation, "replace cycle cancelled");
        }
    }
}

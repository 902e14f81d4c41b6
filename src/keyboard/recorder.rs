//! Press/release capture into an ordered keystroke sequence

use super::{KeyCode, KeyEventType, KeyInput};
use std::collections::HashMap;

/// One keystroke: a press and, once it arrives, the matching release
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Character the key typed, if any
    pub logical: Option<char>,
    /// Physical key
    pub code: KeyCode,
    /// Press time in milliseconds
    pub press_ms: u64,
    /// Release time in milliseconds; `None` while the key is held
    pub release_ms: Option<u64>,
}

impl KeyEvent {
    /// Whether the release has been recorded
    pub fn is_finalized(&self) -> bool {
        self.release_ms.is_some()
    }

    /// How long the key was held, once released
    pub fn dwell_ms(&self) -> Option<f64> {
        self.release_ms
            .map(|release| release as f64 - self.press_ms as f64)
    }
}

/// Records keystrokes in press order.
///
/// Each physical key has at most one open keystroke. A second press of a key
/// that is already down (auto-repeat) is dropped, and so is a release that
/// has no matching press (focus changes). Neither is an error.
#[derive(Debug, Default)]
pub struct EventRecorder {
    /// Keystrokes in press order
    events: Vec<KeyEvent>,
    /// Index into `events` of the open keystroke per physical key
    open: HashMap<KeyCode, usize>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns `false` if the key was already down.
    pub fn on_press(&mut self, code: KeyCode, logical: Option<char>, now_ms: u64) -> bool {
        if self.open.contains_key(&code) {
            log::trace!("ignoring repeated press of {:?}", code);
            return false;
        }

        self.open.insert(code, self.events.len());
        self.events.push(KeyEvent {
            logical,
            code,
            press_ms: now_ms,
            release_ms: None,
        });
        true
    }

    /// Record a key release. Returns `false` if the key was not down.
    pub fn on_release(&mut self, code: KeyCode, now_ms: u64) -> bool {
        let Some(index) = self.open.remove(&code) else {
            log::trace!("ignoring release of {:?} without a press", code);
            return false;
        };

        self.events[index].release_ms = Some(now_ms);
        true
    }

    /// Feed a raw input signal
    pub fn process(&mut self, input: &KeyInput) -> bool {
        match input.event_type {
            KeyEventType::Press => self.on_press(input.key, input.logical, input.timestamp_ms),
            KeyEventType::Release => self.on_release(input.key, input.timestamp_ms),
        }
    }

    /// Drop every keystroke, open or not
    pub fn reset(&mut self) {
        self.events.clear();
        self.open.clear();
    }

    /// Drop the first `count` keystrokes; later ones keep their open state
    pub fn discard_front(&mut self, count: usize) {
        let count = count.min(self.events.len());
        self.events.drain(..count);
        self.open.retain(|_, index| {
            if *index < count {
                return false;
            }
            *index -= count;
            true
        });
    }

    /// Keystrokes in press order
    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Owned copy of the sequence, safe to keep across a reset
    pub fn snapshot(&self) -> Vec<KeyEvent> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Keys currently held down
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Keystrokes with a recorded release
    pub fn finalized_count(&self) -> usize {
        self.events.len() - self.open.len()
    }
}

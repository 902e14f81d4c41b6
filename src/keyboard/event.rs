//! Raw keyboard input signals and the polling listener that produces them

use super::{keymap, KeyCode};
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::sync::mpsc;
use std::time::Instant;

/// Type of keyboard signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    /// Key was pressed down
    Press,
    /// Key was released
    Release,
}

/// A raw press or release signal as it arrives from the input device
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInput {
    /// Physical key
    pub key: KeyCode,
    /// Character the key produces, if any (only meaningful on press)
    pub logical: Option<char>,
    /// Type of signal (press/release)
    pub event_type: KeyEventType,
    /// Milliseconds since the listener's origin
    pub timestamp_ms: u64,
    /// Ctrl, Alt or Meta was down when the key went down
    pub chord: bool,
}

impl KeyInput {
    pub fn press(key: KeyCode, logical: Option<char>, timestamp_ms: u64) -> Self {
        Self {
            key,
            logical,
            event_type: KeyEventType::Press,
            timestamp_ms,
            chord: false,
        }
    }

    pub fn release(key: KeyCode, timestamp_ms: u64) -> Self {
        Self {
            key,
            logical: None,
            event_type: KeyEventType::Release,
            timestamp_ms,
            chord: false,
        }
    }

    /// Mark the signal as part of a shortcut chord
    pub fn in_chord(mut self) -> Self {
        self.chord = true;
        self
    }
}

/// Keyboard listener that polls the global key state for changes.
///
/// Every poll diffs the set of held keys against the previous poll and sends
/// one `KeyInput` per change. Timestamps are monotonic milliseconds measured
/// from the moment the listener was created.
pub struct KeyboardListener {
    device_state: DeviceState,
    last_keys: Vec<Keycode>,
    origin: Instant,
    event_tx: mpsc::Sender<KeyInput>,
}

impl KeyboardListener {
    /// Create a new keyboard listener
    pub fn new(event_tx: mpsc::Sender<KeyInput>) -> Self {
        Self {
            device_state: DeviceState::new(),
            last_keys: Vec::new(),
            origin: Instant::now(),
            event_tx,
        }
    }

    /// Milliseconds elapsed since the listener started
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Poll for keyboard state changes.
    /// Returns the number of signals sent.
    pub fn poll(&mut self) -> usize {
        let now = self.now_ms();
        let current_keys = self.device_state.get_keys();
        let shift = current_keys
            .iter()
            .any(|k| KeyCode::from(*k).is_shift());
        let chord = current_keys
            .iter()
            .any(|k| KeyCode::from(*k).is_chord_modifier());
        let mut sent = 0;

        for key in &current_keys {
            if !self.last_keys.contains(key) {
                let code = KeyCode::from(*key);
                let mut input = KeyInput::press(code, keymap::logical_char(code, shift), now);
                if chord {
                    input = input.in_chord();
                }
                if self.event_tx.send(input).is_ok() {
                    sent += 1;
                }
            }
        }

        for key in &self.last_keys {
            if !current_keys.contains(key)
                && self.event_tx.send(KeyInput::release(KeyCode::from(*key), now)).is_ok()
            {
                sent += 1;
            }
        }

        self.last_keys = current_keys;
        sent
    }
}

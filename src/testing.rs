//! Shared fixtures for unit tests
//!
//! Builds keystrokes from characters and millisecond timestamps.

use crate::keyboard::{EventRecorder, KeyCode, KeyInput, KEYMAP};

/// A press and release of the key that types `ch`
#[derive(Debug, Clone, Copy)]
pub struct Tap {
    pub ch: char,
    pub press_ms: u64,
    pub release_ms: u64,
}

pub fn tap(ch: char, press_ms: u64, release_ms: u64) -> Tap {
    Tap { ch, press_ms, release_ms }
}

/// Physical key that types `ch`, with or without Shift.
/// Main-block keys win over their numpad twins (lowest code).
pub fn code_for(ch: char) -> KeyCode {
    KEYMAP
        .iter()
        .filter(|(_, info)| info.base == Some(ch) || info.shifted == Some(ch))
        .map(|(code, _)| *code)
        .min()
        .unwrap_or(KeyCode::UNKNOWN)
}

pub fn press_at(ch: char, timestamp_ms: u64) -> KeyInput {
    KeyInput::press(code_for(ch), Some(ch), timestamp_ms)
}

pub fn release_at(ch: char, timestamp_ms: u64) -> KeyInput {
    KeyInput::release(code_for(ch), timestamp_ms)
}

/// Recorder fed with each tap's press and release, one tap after another
pub fn record(taps: &[Tap]) -> EventRecorder {
    let mut recorder = EventRecorder::new();
    for t in taps {
        recorder.process(&press_at(t.ch, t.press_ms));
        recorder.process(&release_at(t.ch, t.release_ms));
    }
    recorder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_for_finds_shifted_chars() {
        assert_eq!(code_for('a'), KeyCode(30));
        assert_eq!(code_for('A'), KeyCode(30));
        assert_eq!(code_for('!'), KeyCode(2));
        assert_eq!(code_for('1'), KeyCode(2));
        assert_eq!(code_for('/'), KeyCode(53));
        assert_eq!(code_for('é'), KeyCode::UNKNOWN);
    }

    #[test]
    fn record_closes_every_tap() {
        let rec = record(&[tap('a', 0, 10), tap('b', 20, 30)]);
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.open_count(), 0);
    }
}

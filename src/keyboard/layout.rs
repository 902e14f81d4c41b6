//! Approximate physical key positions on a staggered QWERTY keyboard
//!
//! Used to measure how far the fingers travel between consecutive keys.
//! Only letter keys have a position; every other character is simply absent.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Position of a key in key-width units: `x` grows to the right, `y` grows
/// downwards from the top letter row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardCoordinate {
    pub x: f64,
    pub y: f64,
}

impl KeyboardCoordinate {
    const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another key
    pub fn distance_to(&self, other: &KeyboardCoordinate) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Letter rows with their stagger offset.
const ROWS: [(&str, f64); 3] = [("qwertyuiop", 0.0), ("asdfghjkl", 0.5), ("zxcvbnm", 1.0)];

static COORDINATES: LazyLock<HashMap<char, KeyboardCoordinate>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (row, (keys, offset)) in ROWS.iter().enumerate() {
        for (col, ch) in keys.chars().enumerate() {
            map.insert(ch, KeyboardCoordinate::new(col as f64 + offset, row as f64));
        }
    }
    map
});

/// Read-only lookup from character to key position.
///
/// Lookups are case-insensitive. Built once per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardLayoutMap;

impl KeyboardLayoutMap {
    /// Position of the key that types `ch`, if it is a letter key
    pub fn coordinate(ch: char) -> Option<KeyboardCoordinate> {
        COORDINATES.get(&ch.to_ascii_lowercase()).copied()
    }

    /// Travel distance between two keys, when both have a position
    pub fn distance(from: char, to: char) -> Option<f64> {
        let a = Self::coordinate(from)?;
        let b = Self::coordinate(to)?;
        Some(a.distance_to(&b))
    }

    /// Number of keys with a known position
    pub fn len() -> usize {
        COORDINATES.len()
    }
}

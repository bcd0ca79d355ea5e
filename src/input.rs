//! Held-key tracking for terminals.
//!
//! Many terminals never send key-release events, so a key counts as held
//! while its last press or repeat is recent enough.

use std::collections::HashMap;

use crossterm::event::KeyCode;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  OS key-repeat is ≥ 15 Hz, so 6 frames (≈100 ms) are
/// refreshed in time.
pub const HOLD_WINDOW: u64 = 6;

/// Keys that count as thrust.
pub const THRUST_KEYS: [KeyCode; 4] =
    [KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];

#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    key_frame: HashMap<KeyCode, u64>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or repeat seen on `frame`.
    pub fn press(&mut self, code: KeyCode, frame: u64) {
        self.key_frame.insert(code, frame);
    }

    /// Drop a key, either on release or when its press was consumed as a
    /// command.
    pub fn release(&mut self, code: KeyCode) {
        self.key_frame.remove(&code);
    }

    /// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
    pub fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn thrust(&self, frame: u64) -> bool {
        THRUST_KEYS.iter().any(|&k| self.is_held(k, frame))
    }
}

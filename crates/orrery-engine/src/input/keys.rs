use std::collections::HashSet;

/// Keys the scenes care about. Everything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Space,
    ShiftLeft,
    Other(u32),
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.code` string.
    pub fn from_code(code: &str) -> Self {
        match code {
            "KeyW" => KeyCode::W,
            "KeyA" => KeyCode::A,
            "KeyS" => KeyCode::S,
            "KeyD" => KeyCode::D,
            "Space" => KeyCode::Space,
            "ShiftLeft" => KeyCode::ShiftLeft,
            _ => KeyCode::Other(0),
        }
    }

    /// Map a legacy numeric `keyCode`. Left/right shift share 16.
    pub fn from_key_code(code: u32) -> Self {
        match code {
            87 => KeyCode::W,
            65 => KeyCode::A,
            83 => KeyCode::S,
            68 => KeyCode::D,
            32 => KeyCode::Space,
            16 => KeyCode::ShiftLeft,
            other => KeyCode::Other(other),
        }
    }
}

/// Set of currently held keys, fed from KeyDown / KeyUp.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<KeyCode>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Forget every held key (focus loss, teardown).
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_codes_map_to_keys() {
        assert_eq!(KeyCode::from_code("KeyW"), KeyCode::W);
        assert_eq!(KeyCode::from_code("ShiftLeft"), KeyCode::ShiftLeft);
        assert_eq!(KeyCode::from_code("ShiftRight"), KeyCode::Other(0));
        assert_eq!(KeyCode::from_key_code(32), KeyCode::Space);
        assert_eq!(KeyCode::from_key_code(13), KeyCode::Other(13));
    }

    #[test]
    fn held_keys_track_press_and_release() {
        let mut keys = KeyState::new();
        keys.press(KeyCode::W);
        keys.press(KeyCode::D);
        assert!(keys.is_held(KeyCode::W));
        keys.release(KeyCode::W);
        assert!(!keys.is_held(KeyCode::W));
        assert!(keys.is_held(KeyCode::D));
    }
}

//! Mapping from physical keys to camera movement.

use winit::keyboard::KeyCode;

pub(crate) const KEY_COUNT: usize = 4;

/// The movement keys the sandbox tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKey {
    Forward = 0,
    Backward = 1,
    Left = 2,
    Right = 3,
}

impl MoveKey {
    /// WASD mapping; anything else is not a movement key.
    pub fn from_key_code(code: KeyCode) -> Option<MoveKey> {
        match code {
            KeyCode::KeyW => Some(MoveKey::Forward),
            KeyCode::KeyS => Some(MoveKey::Backward),
            KeyCode::KeyA => Some(MoveKey::Left),
            KeyCode::KeyD => Some(MoveKey::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_movement() {
        assert_eq!(MoveKey::from_key_code(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(MoveKey::from_key_code(KeyCode::KeyS), Some(MoveKey::Backward));
        assert_eq!(MoveKey::from_key_code(KeyCode::KeyA), Some(MoveKey::Left));
        assert_eq!(MoveKey::from_key_code(KeyCode::KeyD), Some(MoveKey::Right));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(MoveKey::from_key_code(KeyCode::Space), None);
        assert_eq!(MoveKey::from_key_code(KeyCode::Escape), None);
    }
}

//! Keyboard/cursor state and its mapping onto the camera.
//!
//! The event thread writes, the render thread reads. Every shared field is
//! an independent atomic (booleans per key, bit-cast f64 for yaw/pitch), so
//! no cross-field consistency is required and no lock is needed.

pub mod cursor;
pub mod keys;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub use cursor::CursorTracker;
pub use keys::MoveKey;

use crate::gfx::camera::Camera;

/// Yaw matching an initial view direction of -Z.
pub const INITIAL_YAW_DEG: f64 = -90.0;

/// Input state shared between the event and render threads.
pub struct InputState {
    keys: [AtomicBool; keys::KEY_COUNT],
    yaw: AtomicU64,
    pitch: AtomicU64,
}

impl InputState {
    pub fn new() -> InputState {
        InputState {
            keys: Default::default(),
            yaw: AtomicU64::new(INITIAL_YAW_DEG.to_bits()),
            pitch: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn set_key(&self, key: MoveKey, pressed: bool) {
        self.keys[key as usize].store(pressed, Ordering::Relaxed);
    }

    pub fn is_pressed(&self, key: MoveKey) -> bool {
        self.keys[key as usize].load(Ordering::Relaxed)
    }

    pub fn set_rotation(&self, yaw_deg: f64, pitch_deg: f64) {
        self.yaw.store(yaw_deg.to_bits(), Ordering::Relaxed);
        self.pitch.store(pitch_deg.to_bits(), Ordering::Relaxed);
    }

    pub fn rotation(&self) -> (f64, f64) {
        (
            f64::from_bits(self.yaw.load(Ordering::Relaxed)),
            f64::from_bits(self.pitch.load(Ordering::Relaxed)),
        )
    }

    /// Moves the camera for every currently pressed key, scaled by the
    /// frame's wall-clock step.
    pub fn apply_movement(&self, camera: &mut Camera, step: f32) {
        if self.is_pressed(MoveKey::Forward) {
            camera.move_forward(step);
        }
        if self.is_pressed(MoveKey::Backward) {
            camera.move_backward(step);
        }
        if self.is_pressed(MoveKey::Left) {
            camera.move_left(step);
        }
        if self.is_pressed(MoveKey::Right) {
            camera.move_right(step);
        }
    }

    /// Applies the accumulated yaw/pitch to the camera.
    pub fn apply_rotation(&self, camera: &mut Camera) {
        let (yaw, pitch) = self.rotation();
        camera.rotate(yaw as f32, pitch as f32);
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Point3, Vector3};

    fn camera() -> Camera {
        Camera::new(
            45.0,
            1.0,
            0.1,
            100.0,
            Point3::new(0.0, 0.0, 5.0),
            Vector3::unit_y(),
            -Vector3::unit_z(),
        )
    }

    #[test]
    fn keys_set_and_clear() {
        let input = InputState::new();
        assert!(!input.is_pressed(MoveKey::Forward));
        input.set_key(MoveKey::Forward, true);
        assert!(input.is_pressed(MoveKey::Forward));
        assert!(!input.is_pressed(MoveKey::Backward));
        input.set_key(MoveKey::Forward, false);
        assert!(!input.is_pressed(MoveKey::Forward));
    }

    #[test]
    fn rotation_round_trips_through_bits() {
        let input = InputState::new();
        assert_eq!(input.rotation(), (INITIAL_YAW_DEG, 0.0));
        input.set_rotation(-123.25, 42.5);
        assert_eq!(input.rotation(), (-123.25, 42.5));
    }

    #[test]
    fn movement_scales_with_step() {
        let input = InputState::new();
        let mut cam = camera();
        input.set_key(MoveKey::Forward, true);
        input.apply_movement(&mut cam, 0.5);
        assert!((cam.position().z - 4.5).abs() < 1e-5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let input = InputState::new();
        let mut cam = camera();
        input.set_key(MoveKey::Left, true);
        input.set_key(MoveKey::Right, true);
        input.apply_movement(&mut cam, 1.0);
        assert!((cam.position() - Point3::new(0.0, 0.0, 5.0)).magnitude() < 1e-5);
    }
}

//! Cursor-delta tracking on the event thread.

use super::{InputState, INITIAL_YAW_DEG};

const PITCH_LIMIT_DEG: f64 = 89.0;

/// Accumulates yaw/pitch from cursor movement.
///
/// Owned by the event thread; publishes the accumulated angles through the
/// shared [`InputState`]. The very first move event only records the cursor
/// position, since there is no previous position to diff against yet.
pub struct CursorTracker {
    sensitivity: f64,
    first_move: bool,
    prev_x: f64,
    prev_y: f64,
    yaw_deg: f64,
    pitch_deg: f64,
}

impl CursorTracker {
    pub fn new(sensitivity: f64) -> CursorTracker {
        CursorTracker {
            sensitivity,
            first_move: true,
            prev_x: 0.0,
            prev_y: 0.0,
            yaw_deg: INITIAL_YAW_DEG,
            pitch_deg: 0.0,
        }
    }

    /// Handles one cursor-moved event and publishes the new angles.
    pub fn handle_move(&mut self, x: f64, y: f64, input: &InputState) {
        if self.first_move {
            self.prev_x = x;
            self.prev_y = y;
            self.first_move = false;
            return;
        }

        let dx = x - self.prev_x;
        // Screen y grows downward; pitching up means a negative dy.
        let dy = self.prev_y - y;
        self.prev_x = x;
        self.prev_y = y;

        self.yaw_deg += dx * self.sensitivity;
        self.pitch_deg =
            (self.pitch_deg + dy * self.sensitivity).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

        input.set_rotation(self.yaw_deg, self.pitch_deg);
    }

    pub fn yaw_deg(&self) -> f64 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_only_records_position() {
        let input = InputState::new();
        let mut tracker = CursorTracker::new(0.05);
        tracker.handle_move(100.0, 200.0, &input);
        assert_eq!(tracker.yaw_deg(), INITIAL_YAW_DEG);
        assert_eq!(tracker.pitch_deg(), 0.0);
        assert_eq!(input.rotation(), (INITIAL_YAW_DEG, 0.0));
    }

    #[test]
    fn deltas_accumulate_scaled_by_sensitivity() {
        let input = InputState::new();
        let mut tracker = CursorTracker::new(0.05);
        tracker.handle_move(100.0, 200.0, &input);
        tracker.handle_move(120.0, 190.0, &input);
        assert!((tracker.yaw_deg() - (INITIAL_YAW_DEG + 1.0)).abs() < 1e-9);
        assert!((tracker.pitch_deg() - 0.5).abs() < 1e-9);
        let (yaw, pitch) = input.rotation();
        assert!((yaw - tracker.yaw_deg()).abs() < 1e-9);
        assert!((pitch - tracker.pitch_deg()).abs() < 1e-9);
    }

    #[test]
    fn pitch_clamps_at_89_degrees() {
        let input = InputState::new();
        let mut tracker = CursorTracker::new(1.0);
        tracker.handle_move(0.0, 0.0, &input);
        tracker.handle_move(0.0, -500.0, &input);
        assert_eq!(tracker.pitch_deg(), 89.0);
        tracker.handle_move(0.0, 1000.0, &input);
        assert_eq!(tracker.pitch_deg(), -89.0);
    }
}

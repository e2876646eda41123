//! Free-fly perspective camera.

use cgmath::{perspective, Deg, InnerSpace, Matrix3, Matrix4, Point3, Vector3};

/// Maps OpenGL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

const PITCH_LIMIT_DEG: f32 = 89.0;

/// Camera with yaw/pitch orientation and a fixed perspective projection.
///
/// Yaw and pitch are kept in degrees; pitch is clamped to ±89° so the view
/// direction never flips over the world up vector.
pub struct Camera {
    position: Point3<f32>,
    world_up: Vector3<f32>,
    direction: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    yaw_deg: f32,
    pitch_deg: f32,
    fovy: Deg<f32>,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn new(
        fovy_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
        position: Point3<f32>,
        world_up: Vector3<f32>,
        direction: Vector3<f32>,
    ) -> Camera {
        let direction = direction.normalize();
        // Derive the starting yaw/pitch from the given view direction so the
        // first rotate() continues from it instead of snapping.
        let pitch_deg = direction.y.asin().to_degrees();
        let yaw_deg = direction.z.atan2(direction.x).to_degrees();

        let mut camera = Camera {
            position,
            world_up: world_up.normalize(),
            direction,
            right: Vector3::unit_x(),
            up: world_up,
            yaw_deg,
            pitch_deg,
            fovy: Deg(fovy_deg),
            aspect,
            near,
            far,
        };
        camera.update_vectors();
        camera
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        self.direction = Vector3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize();
        self.right = self.direction.cross(self.world_up).normalize();
        self.up = self.right.cross(self.direction).normalize();
    }

    /// Sets the orientation in degrees. Pitch is clamped to ±89° before the
    /// conversion to radians.
    pub fn rotate(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw_deg = yaw_deg;
        self.pitch_deg = pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        self.update_vectors();
    }

    pub fn move_forward(&mut self, step: f32) {
        self.position += self.direction * step;
    }

    pub fn move_backward(&mut self, step: f32) {
        self.position -= self.direction * step;
    }

    pub fn move_left(&mut self, step: f32) {
        self.position -= self.right * step;
    }

    pub fn move_right(&mut self, step: f32) {
        self.position += self.right * step;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    /// View matrix with the translation stripped, so the skybox stays
    /// centered on the viewer.
    pub fn skybox_view_matrix(&self) -> Matrix4<f32> {
        let view = self.view_matrix();
        Matrix4::from(Matrix3::from_cols(
            view.x.truncate(),
            view.y.truncate(),
            view.z.truncate(),
        ))
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.near, self.far)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(
            45.0,
            4.0 / 3.0,
            0.1,
            100.0,
            Point3::new(0.0, 0.0, 5.0),
            Vector3::unit_y(),
            -Vector3::unit_z(),
        )
    }

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn initial_direction_survives_yaw_pitch_roundtrip() {
        let cam = camera();
        assert!(close(cam.direction(), -Vector3::unit_z()));
        assert_eq!(cam.yaw_deg(), -90.0);
        assert_eq!(cam.pitch_deg(), 0.0);
    }

    #[test]
    fn rotate_clamps_pitch_before_radians() {
        let mut cam = camera();
        cam.rotate(0.0, 95.0);
        assert_eq!(cam.pitch_deg(), 89.0);
        cam.rotate(0.0, -120.0);
        assert_eq!(cam.pitch_deg(), -89.0);
        // Direction stays a unit vector through the clamp.
        assert!((cam.direction().magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn movement_follows_orientation() {
        let mut cam = camera();
        cam.move_forward(2.0);
        assert!((cam.position().z - 3.0).abs() < 1e-5);
        cam.move_right(1.0);
        assert!((cam.position().x - 1.0).abs() < 1e-5);
        cam.move_backward(2.0);
        cam.move_left(1.0);
        assert!((cam.position() - Point3::new(0.0, 0.0, 5.0)).magnitude() < 1e-5);
    }

    #[test]
    fn yaw_rotation_turns_the_view() {
        let mut cam = camera();
        cam.rotate(0.0, 0.0);
        assert!(close(cam.direction(), Vector3::unit_x()));
        cam.rotate(90.0, 0.0);
        assert!(close(cam.direction(), Vector3::unit_z()));
    }

    #[test]
    fn skybox_view_has_no_translation() {
        let cam = camera();
        let skybox_view = cam.skybox_view_matrix();
        assert_eq!(skybox_view.w.truncate(), Vector3::new(0.0, 0.0, 0.0));
        // The rotation block matches the full view matrix.
        let view = cam.view_matrix();
        assert!(close(view.x.truncate(), skybox_view.x.truncate()));
    }
}

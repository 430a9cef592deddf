//! Fixed perspective camera for the viewer.
//!
//! The camera sits on the +z axis looking at the origin, so the simulation
//! plane (z = 0) fills the view. Pointer input is mapped back onto that
//! plane with [`Camera::screen_to_world`].

use glam::{Mat4, Vec3, Vec4};

pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Camera {
    /// Create the viewer camera at (0, 0, 10) with an 80 degree FOV.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            fov_y: 80.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Track the viewport aspect ratio across resizes.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix for uniform upload.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Maps a cursor position in physical pixels onto the z = 0 plane.
    ///
    /// Unprojects the pixel through the inverse view-projection and casts a
    /// ray from the camera through it. Returns `None` when the ray runs
    /// parallel to the plane and never reaches it.
    pub fn screen_to_world(
        &self,
        cursor_x: f32,
        cursor_y: f32,
        width: u32,
        height: u32,
    ) -> Option<Vec3> {
        if width == 0 || height == 0 {
            return None;
        }
        let ndc_x = (cursor_x / width as f32) * 2.0 - 1.0;
        let ndc_y = -(cursor_y / height as f32) * 2.0 + 1.0;

        let clip = Vec4::new(ndc_x, ndc_y, 0.5, 1.0);
        let world = self.view_proj().inverse() * clip;
        if world.w == 0.0 {
            return None;
        }
        let point = world.truncate() / world.w;

        let direction = (point - self.position).normalize();
        if direction.z == 0.0 {
            return None;
        }
        let distance = -self.position.z / direction.z;
        let hit = self.position + direction * distance;
        Some(Vec3::new(hit.x, hit.y, 0.0))
    }
}

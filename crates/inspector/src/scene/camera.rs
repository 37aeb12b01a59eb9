use glam::{DMat4, DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Ray};

const MIN_DISTANCE: f64 = 1e-6;

/// Pixel size of the render area. Screen coordinates start at the top-left
/// corner with y growing downwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f64 {
        self.width / self.height.max(1.0)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Arc-ball camera orbiting a target point
#[derive(Clone, Debug, PartialEq)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f64,
    /// Vertical rotation angle (radians)
    pub pitch: f64,
    /// Distance from target
    pub distance: f64,
    /// Camera target point
    pub target: DVec3,
    /// Vertical field of view (radians)
    pub fov: f64,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    /// Front view: eye on +Z looking along -Z
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 10.0,
            target: DVec3::ZERO,
            fov: 30.0_f64.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx_deg: f64, dy_deg: f64) {
        self.yaw += dx_deg.to_radians();
        self.pitch = (self.pitch + dy_deg.to_radians()).clamp(-1.5, 1.5);
    }

    /// Move towards the target by `delta` of the current distance (negative zooms out)
    pub fn zoom(&mut self, delta: f64) {
        self.distance = (self.distance * (1.0 - delta)).max(MIN_DISTANCE);
    }

    /// Aim at the centre of `bounds` from far enough away to see all of it
    pub fn frame(&mut self, bounds: &Aabb) {
        let radius = (bounds.diagonal() * 0.5).max(MIN_DISTANCE);
        self.target = bounds.center();
        self.distance = radius / (self.fov * 0.5).sin() * 1.1;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> DVec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + DVec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye_position(), self.target, DVec3::Y)
    }

    /// Projection matrix (camera -> clip); clip range follows the distance
    pub fn projection_matrix(&self, aspect: f64) -> DMat4 {
        let near = (self.distance * 1e-3).max(MIN_DISTANCE);
        let far = self.distance * 100.0;
        DMat4::perspective_rh_gl(self.fov, aspect, near, far)
    }

    pub fn view_projection(&self, aspect: f64) -> DMat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space length covered by one pixel at the target depth
    pub fn world_per_pixel(&self, viewport: &Viewport) -> f64 {
        2.0 * (self.fov * 0.5).tan() * self.distance / viewport.height.max(1.0)
    }

    /// World-space length covered by one pixel at `depth` along the view direction
    pub fn world_per_pixel_at(&self, depth: f64, viewport: &Viewport) -> f64 {
        2.0 * (self.fov * 0.5).tan() * depth / viewport.height.max(1.0)
    }

    /// Project a 3D point to screen coordinates, `None` behind the eye
    pub fn project(&self, point: DVec3, viewport: &Viewport) -> Option<DVec2> {
        let vp = self.view_projection(viewport.aspect());
        let p = vp * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let center = viewport.center();
        Some(DVec2::new(
            center.x + ndc.x * viewport.width * 0.5,
            center.y - ndc.y * viewport.height * 0.5,
        ))
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: DVec2, viewport: &Viewport) -> Ray {
        let center = viewport.center();

        // Screen → NDC
        let ndc_x = (screen_pos.x - center.x) / (viewport.width * 0.5);
        let ndc_y = -(screen_pos.y - center.y) / (viewport.height * 0.5);

        let vp_inv = self.view_projection(viewport.aspect()).inverse();

        let near_world = vp_inv * DVec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_world = vp_inv * DVec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_looks_down_negative_z() {
        let cam = ArcBallCamera::new();
        let vp = Viewport::default();
        let ray = cam.screen_ray(vp.center(), &vp);
        assert_eq!(ray.origin, DVec3::new(0.0, 0.0, 10.0));
        assert!((ray.direction - DVec3::NEG_Z).length() < 1e-9);
    }

    #[test]
    fn test_project_then_ray_passes_through_point() {
        let mut cam = ArcBallCamera::new();
        cam.rotate(20.0, 15.0);
        let vp = Viewport::default();
        let point = DVec3::new(0.7, -0.4, 1.1);
        let screen = cam.project(point, &vp).unwrap();
        let ray = cam.screen_ray(screen, &vp);
        let t = (point - ray.origin).dot(ray.direction);
        assert!((ray.at(t) - point).length() < 1e-9);
    }

    #[test]
    fn test_frame_targets_center() {
        let mut cam = ArcBallCamera::new();
        let bounds = Aabb::new(DVec3::new(1.0, 1.0, 1.0), DVec3::new(3.0, 5.0, 7.0));
        cam.frame(&bounds);
        assert_eq!(cam.target, DVec3::new(2.0, 3.0, 4.0));
        assert!(cam.distance > bounds.diagonal() * 0.5);
    }

    #[test]
    fn test_world_per_pixel_scales_with_distance() {
        let mut cam = ArcBallCamera::new();
        let vp = Viewport::default();
        let near = cam.world_per_pixel(&vp);
        cam.zoom(-1.0);
        assert!((cam.world_per_pixel(&vp) - 2.0 * near).abs() < 1e-12);
    }
}

/// Orbit camera controls around a fixed target, Y up
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

use crate::projection::Camera;

const EPS: f32 = 1e-6;

/// Closest the camera may get to its target by default
pub const MIN_DISTANCE: f32 = 1.0;

/// Spherical coordinates: `phi` is the polar angle from +Y, `theta` the
/// azimuth around Y measured from +Z
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: &Vector3<f32>) -> Self {
        let radius = offset.norm();
        if radius < EPS {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi = self.phi.sin();
        Vector3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit controls: input accumulates deltas, `update` applies them to the camera
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    saved: Option<(Point3<f32>, Point3<f32>)>,
}

impl OrbitControls {
    pub fn new(target: Point3<f32>) -> Self {
        Self {
            target,
            min_distance: MIN_DISTANCE,
            max_distance: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            saved: None,
        }
    }

    /// Controls for a camera, remembering its pose for [`OrbitControls::reset`]
    pub fn for_camera(camera: &Camera) -> Self {
        let mut controls = Self::new(camera.target);
        controls.save_state(camera);
        controls
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Move the camera closer by `scale` (> 1)
    pub fn dolly_in(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale /= scale;
        }
    }

    /// Move the camera away by `scale` (> 1)
    pub fn dolly_out(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale *= scale;
        }
    }

    pub fn save_state(&mut self, camera: &Camera) {
        self.saved = Some((camera.position, self.target));
    }

    /// Restore the saved camera pose and drop pending input
    pub fn reset(&mut self, camera: &mut Camera) {
        if let Some((position, target)) = self.saved {
            camera.position = position;
            self.target = target;
            camera.target = target;
        }
        self.clear_deltas();
    }

    /// Apply pending input to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_offset(&offset);

        spherical.theta += self.delta_theta;
        spherical.phi = (spherical.phi + self.delta_phi).clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let position = self.target + spherical.to_offset();
        let moved = (position - camera.position).norm_squared() > EPS;

        camera.position = position;
        camera.target = self.target;
        self.clear_deltas();

        moved
    }

    fn clear_deltas(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
    }
}

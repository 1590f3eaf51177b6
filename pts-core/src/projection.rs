/// Camera pose and projection utilities
use nalgebra::{Matrix4, Point3, Unit, UnitQuaternion, Vector3};

use crate::bounds::Aabb;

/// Where the camera sits, what it looks at and which way is up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl CameraPose {
    /// Front view elevated 45 degrees, `distance` units from the origin.
    ///
    /// The pose only depends on `distance`, never on the point data:
    /// position `(0, d*sqrt(2)/2, -d*sqrt(2)/2)`, target the origin, up `+z`.
    pub fn from_distance(distance: f32) -> Self {
        let (y_offset, z_offset) = Self::offsets(distance);
        Self {
            position: Point3::new(0.0, y_offset, z_offset),
            target: Point3::origin(),
            up: Vector3::z(),
        }
    }

    /// `(yOffset, zOffset)` for a camera `distance` away at 45 degrees
    pub fn offsets(distance: f32) -> (f32, f32) {
        let half_sqrt2 = std::f32::consts::SQRT_2 / 2.0;
        (distance * half_sqrt2, -distance * half_sqrt2)
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let pose = CameraPose::default();
        Self {
            position: pose.position,
            target: pose.target,
            up: pose.up,
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
            up: self.up,
        }
    }

    pub fn set_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
        self.up = pose.up;
        self.fit_clip_planes(pose.distance().max(1.0));
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Transform a world point into view space (camera looks down `-z`)
    pub fn to_view(&self, point: &Point3<f32>) -> Point3<f32> {
        self.view_matrix().transform_point(point)
    }

    /// Project a view-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `depth` the distance along the view axis.
    /// Points behind the near plane give `None`; points off screen are still
    /// returned so callers can clip partially visible shapes themselves.
    pub fn project_view(&self, view: &Point3<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let depth = -view.z;
        if depth < self.near {
            return None;
        }

        let ndc = self.projection_matrix().transform_point(view);
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }

    /// Project a 3D world point to 2D screen space
    pub fn project_to_screen(&self, point: &Point3<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        self.project_view(&self.to_view(point), width, height)
    }

    /// Screen rows covered by one world unit at `depth`
    pub fn rows_per_unit(&self, depth: f32, height: u32) -> f32 {
        height as f32 / (2.0 * depth * (self.fov / 2.0).tan())
    }

    /// Re-frame the camera around `bounds`.
    ///
    /// Keeps the viewing direction and up vector, aims at the bounds centre
    /// and backs off until the bounding sphere fits the narrower field of
    /// view. Empty or non-finite bounds leave the camera untouched.
    pub fn reset_to_bounds(&mut self, bounds: &Aabb) {
        if bounds.is_empty() || !bounds.is_finite() {
            return;
        }

        let radius = match bounds.radius() {
            r if r > f32::EPSILON => r,
            _ => 0.5,
        };

        let half_fov_y = self.fov / 2.0;
        let half_fov_x = (half_fov_y.tan() * self.aspect).atan();
        let half_fov = half_fov_y.min(half_fov_x);
        let distance = radius / half_fov.sin();

        let direction = match (self.position - self.target).try_normalize(f32::EPSILON) {
            Some(direction) => direction,
            None => Vector3::z(),
        };

        self.target = bounds.center();
        self.position = self.target + direction * distance;
        self.fit_clip_planes(distance + radius);
    }

    /// Rotate the camera around its target.
    ///
    /// `yaw` turns about the up vector, `pitch` about the camera's right
    /// axis. Pitch stops short of looking straight along the up vector.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let Some(up) = Unit::try_new(self.up, f32::EPSILON) else {
            return;
        };
        let mut offset = UnitQuaternion::from_axis_angle(&up, yaw) * (self.position - self.target);

        let forward = -offset;
        if let Some(right) = Unit::try_new(forward.cross(up.as_ref()), f32::EPSILON) {
            let pitched = UnitQuaternion::from_axis_angle(&right, pitch) * offset;
            let elevation = pitched.angle(up.as_ref());
            if elevation > 0.02 && elevation < std::f32::consts::PI - 0.02 {
                offset = pitched;
            }
        }

        self.position = self.target + offset;
    }

    /// Scale the distance to the target by `factor`
    pub fn zoom(&mut self, factor: f32) {
        let offset = (self.position - self.target) * factor;
        if offset.norm() > self.near * 2.0 {
            self.position = self.target + offset;
            self.fit_clip_planes(offset.norm());
        }
    }

    fn fit_clip_planes(&mut self, reach: f32) {
        self.far = self.far.max(reach * 4.0);
        self.near = (reach * 0.001).clamp(0.01, 0.1);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

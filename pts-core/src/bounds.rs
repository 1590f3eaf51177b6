/// Axis-aligned bounds of rendered geometry
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Bounds containing nothing; the first included point defines them
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Whether every corner coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.min.coords.iter().chain(self.max.coords.iter()).all(|c| c.is_finite())
    }

    pub fn include_point(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn include_sphere(&mut self, center: &Point3<f32>, radius: f32) {
        let extent = Vector3::repeat(radius.abs());
        self.include_point(&(center - extent));
        self.include_point(&(center + extent));
    }

    pub fn merge(&mut self, other: &Aabb) {
        if !other.is_empty() {
            self.include_point(&other.min);
            self.include_point(&other.max);
        }
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Radius of the sphere through the box corners
    pub fn radius(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        (self.max - self.min).norm() / 2.0
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

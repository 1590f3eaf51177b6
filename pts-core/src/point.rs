/// Point records read from PTS files
use nalgebra::{Point3, Vector3};

/// A bare 3D sample with no orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionPoint {
    pub position: Point3<f32>,
}

impl PositionPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

/// A 3D sample with an associated direction (surface normal, ray, ...)
///
/// The direction is stored as read and is not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedPoint {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl OrientedPoint {
    pub fn new(x: f32, y: f32, z: f32, u: f32, v: f32, w: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            direction: Vector3::new(u, v, w),
        }
    }

    /// End point of the direction indicator drawn `scale` units along the direction
    pub fn tip(&self, scale: f32) -> Point3<f32> {
        self.position + self.direction * scale
    }
}

/// One classified line of a PTS file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PtsRecord {
    Position(PositionPoint),
    Oriented(OrientedPoint),
}

impl PtsRecord {
    /// Classify a scanned token list by its length.
    ///
    /// Exactly 3 values give a position point, exactly 6 an oriented point.
    /// Every other length is not a record.
    pub fn from_values(values: &[f32]) -> Option<Self> {
        match *values {
            [x, y, z] => Some(Self::Position(PositionPoint::new(x, y, z))),
            [x, y, z, u, v, w] => Some(Self::Oriented(OrientedPoint::new(x, y, z, u, v, w))),
            _ => None,
        }
    }
}

/// The two point sequences of a PTS file, each in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    pub positions: Vec<PositionPoint>,
    pub oriented: Vec<OrientedPoint>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PtsRecord) {
        match record {
            PtsRecord::Position(point) => self.positions.push(point),
            PtsRecord::Oriented(point) => self.oriented.push(point),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() + self.oriented.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.oriented.is_empty()
    }
}

impl FromIterator<PtsRecord> for PointSet {
    fn from_iter<I: IntoIterator<Item = PtsRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.push(record);
        }
        set
    }
}

/// Scene store shared by viewer implementations
///
/// Shapes live in a slot vector; a [`ShapeHandle`] is the slot index and
/// stays valid until the shape is removed. Removed slots are never reused,
/// so a stale handle can not alias a newer shape.
use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::bounds::Aabb;
use crate::error::{PtsError, Result};

/// Stable reference to a shape added to a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(usize);

impl ShapeHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from channels in `0.0..=1.0`
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Scale every channel by `factor` (clamped to `0.0..=1.0`)
    pub fn shade(&self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let channel = |c: u8| (c as f32 * factor).round() as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Sphere { center: Point3<f32>, radius: f32 },
    Line { from: Point3<f32>, to: Point3<f32>, width: f32 },
}

/// A rendering primitive with its colour and display label
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub label: String,
    pub color: Rgb,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn sphere(center: Point3<f32>, radius: f32, color: Rgb, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color,
            kind: ShapeKind::Sphere { center, radius },
        }
    }

    pub fn line(from: Point3<f32>, to: Point3<f32>, color: Rgb, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color,
            kind: ShapeKind::Line { from, to, width: 1.0 },
        }
    }

    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        match &self.kind {
            ShapeKind::Sphere { center, radius } => bounds.include_sphere(center, *radius),
            ShapeKind::Line { from, to, .. } => {
                bounds.include_point(from);
                bounds.include_point(to);
            }
        }
        bounds
    }
}

/// Background, axes and shapes of one viewer
#[derive(Debug, Clone)]
pub struct Scene {
    shapes: Vec<Option<Shape>>,
    pub background: Rgb,
    /// Length of the coordinate axes gizmo, hidden when `None`
    pub axes_scale: Option<f32>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            background: Rgb::new(0, 0, 0),
            axes_scale: None,
        }
    }

    pub fn add(&mut self, shape: Shape) -> ShapeHandle {
        tracing::trace!(label = %shape.label, "adding shape");
        self.shapes.push(Some(shape));
        ShapeHandle(self.shapes.len() - 1)
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(handle.0).and_then(Option::as_ref)
    }

    pub fn remove(&mut self, handle: ShapeHandle) -> Result<Shape> {
        self.shapes
            .get_mut(handle.0)
            .and_then(Option::take)
            .ok_or(PtsError::UnknownShape(handle))
    }

    pub fn set_line_width(&mut self, handle: ShapeHandle, line_width: f32) -> Result<()> {
        let shape = self
            .shapes
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .ok_or(PtsError::UnknownShape(handle))?;

        match &mut shape.kind {
            ShapeKind::Line { width, .. } => {
                *width = line_width;
                Ok(())
            }
            ShapeKind::Sphere { .. } => Err(PtsError::NotALine(handle)),
        }
    }

    /// Handle of the live shape carrying `label`
    pub fn find(&self, label: &str) -> Option<ShapeHandle> {
        self.shapes()
            .find(|(_, shape)| shape.label == label)
            .map(|(handle, _)| handle)
    }

    /// Live shapes in insertion order
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> {
        self.shapes
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|shape| (ShapeHandle(index), shape)))
    }

    pub fn len(&self) -> usize {
        self.shapes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The axes gizmo as `(direction, colour)` segments starting at the origin
    pub fn axes(&self) -> Option<[(Vector3<f32>, Rgb); 3]> {
        self.axes_scale.map(|scale| {
            [
                (Vector3::x() * scale, Rgb::RED),
                (Vector3::y() * scale, Rgb::GREEN),
                (Vector3::z() * scale, Rgb::BLUE),
            ]
        })
    }

    /// Bounds of everything drawn, axes included
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for (_, shape) in self.shapes() {
            bounds.merge(&shape.bounds());
        }
        if let Some(axes) = self.axes() {
            bounds.include_point(&Point3::origin());
            for (axis, _) in axes {
                bounds.include_point(&Point3::from(axis));
            }
        }
        bounds
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

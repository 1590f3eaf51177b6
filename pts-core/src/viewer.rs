/// Viewer collaborator and the scene driver
///
/// [`Viewer`] is everything the driver needs from an interactive 3D viewer.
/// [`build_scene`] turns a [`PointSet`] into viewer primitives and
/// [`run_until_closed`] spins the viewer until the user closes it.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nalgebra::Point3;

use crate::error::PtsError;
use crate::point::PointSet;
use crate::projection::CameraPose;
use crate::scene::{Rgb, ShapeHandle};

/// Operations an interactive viewer provides to the driver
pub trait Viewer {
    type Error: std::error::Error + From<PtsError> + Send + Sync + 'static;

    fn set_background(&mut self, color: Rgb);

    /// Show the coordinate axes gizmo with arms `scale` units long
    fn show_axes(&mut self, scale: f32);

    fn set_camera(&mut self, pose: &CameraPose);

    fn add_sphere(&mut self, center: Point3<f32>, radius: f32, color: Rgb, label: &str) -> ShapeHandle;

    fn add_line(&mut self, from: Point3<f32>, to: Point3<f32>, color: Rgb, label: &str) -> ShapeHandle;

    fn set_line_width(&mut self, handle: ShapeHandle, width: f32) -> Result<(), Self::Error>;

    fn remove_shape(&mut self, handle: ShapeHandle) -> Result<(), Self::Error>;

    /// Re-frame the camera so every shape is visible
    fn reset_camera(&mut self);

    /// Process one batch of pending events, waiting at most `timeout`, and redraw
    fn spin_once(&mut self, timeout: Duration) -> Result<(), Self::Error>;

    /// Whether the user asked for the viewer to close
    fn was_stopped(&self) -> bool;
}

/// Fixed presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub background: Rgb,
    pub axes_scale: f32,
    pub position_radius: f32,
    pub oriented_radius: f32,
    pub line_width: f32,
    /// Distance used to derive the initial camera pose
    pub camera_distance: f32,
    /// Length multiplier applied to direction vectors
    pub normal_scale: f32,
    pub position_color: Rgb,
    pub oriented_color: Rgb,
    pub normal_color: Rgb,
    pub poll_interval: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: Rgb::from_unit(0.2, 0.2, 0.2),
            axes_scale: 5.0,
            position_radius: 0.3,
            oriented_radius: 0.3,
            line_width: 3.0,
            camera_distance: 2.0,
            normal_scale: 2.0,
            position_color: Rgb::RED,
            oriented_color: Rgb::GREEN,
            normal_color: Rgb::RED,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Handles of the shapes created for a point set, indexed like the point sequences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneHandles {
    pub position_spheres: Vec<ShapeHandle>,
    pub oriented_spheres: Vec<ShapeHandle>,
    pub normals: Vec<ShapeHandle>,
}

impl SceneHandles {
    pub fn len(&self) -> usize {
        self.position_spheres.len() + self.oriented_spheres.len() + self.normals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Populate `viewer` with one sphere per point and one line per direction.
///
/// Sets up background, axes and the initial camera pose first and finishes
/// with a camera reset so the whole cloud is framed.
pub fn build_scene<V: Viewer>(
    points: &PointSet,
    config: &ViewerConfig,
    viewer: &mut V,
) -> Result<SceneHandles, V::Error> {
    viewer.set_background(config.background);
    viewer.show_axes(config.axes_scale);
    viewer.set_camera(&CameraPose::from_distance(config.camera_distance));

    let mut handles = SceneHandles::default();

    for (i, point) in points.positions.iter().enumerate() {
        let handle = viewer.add_sphere(
            point.position,
            config.position_radius,
            config.position_color,
            &format!("XYZ_sphere_{}", i),
        );
        handles.position_spheres.push(handle);
    }

    for (i, point) in points.oriented.iter().enumerate() {
        let sphere = viewer.add_sphere(
            point.position,
            config.oriented_radius,
            config.oriented_color,
            &format!("UVW_sphere_{}", i),
        );
        handles.oriented_spheres.push(sphere);

        let normal = viewer.add_line(
            point.position,
            point.tip(config.normal_scale),
            config.normal_color,
            &format!("normal_{}", i),
        );
        viewer.set_line_width(normal, config.line_width)?;
        handles.normals.push(normal);
    }

    tracing::debug!(shapes = handles.len(), "scene built");
    viewer.reset_camera();
    Ok(handles)
}

/// Shared flag that ends [`run_until_closed`] from outside the viewer
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Spin `viewer` until it is stopped or `cancel` fires.
///
/// Each iteration waits at most `poll` for input. Returns the number of
/// iterations run.
pub fn run_until_closed<V: Viewer>(viewer: &mut V, poll: Duration, cancel: &CancelToken) -> Result<usize, V::Error> {
    let mut iterations = 0;
    while !viewer.was_stopped() && !cancel.is_cancelled() {
        viewer.spin_once(poll)?;
        iterations += 1;
    }
    tracing::debug!(iterations, "display loop finished");
    Ok(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{OrientedPoint, PositionPoint, PtsRecord};
    use crate::scene::{Scene, Shape};

    #[derive(Default)]
    struct CountingViewer {
        scene: Scene,
        pose: Option<CameraPose>,
        resets: usize,
        spins: usize,
        stop_after: usize,
    }

    impl Viewer for CountingViewer {
        type Error = PtsError;

        fn set_background(&mut self, color: Rgb) {
            self.scene.background = color;
        }

        fn show_axes(&mut self, scale: f32) {
            self.scene.axes_scale = Some(scale);
        }

        fn set_camera(&mut self, pose: &CameraPose) {
            self.pose = Some(*pose);
        }

        fn add_sphere(&mut self, center: Point3<f32>, radius: f32, color: Rgb, label: &str) -> ShapeHandle {
            self.scene.add(Shape::sphere(center, radius, color, label))
        }

        fn add_line(&mut self, from: Point3<f32>, to: Point3<f32>, color: Rgb, label: &str) -> ShapeHandle {
            self.scene.add(Shape::line(from, to, color, label))
        }

        fn set_line_width(&mut self, handle: ShapeHandle, width: f32) -> Result<(), PtsError> {
            self.scene.set_line_width(handle, width)
        }

        fn remove_shape(&mut self, handle: ShapeHandle) -> Result<(), PtsError> {
            self.scene.remove(handle).map(|_| ())
        }

        fn reset_camera(&mut self) {
            self.resets += 1;
        }

        fn spin_once(&mut self, _timeout: Duration) -> Result<(), PtsError> {
            self.spins += 1;
            Ok(())
        }

        fn was_stopped(&self) -> bool {
            self.spins >= self.stop_after
        }
    }

    #[test]
    fn test_build_scene_labels_and_order() {
        let points: PointSet = [
            PtsRecord::Position(PositionPoint::new(1.0, 2.0, 3.0)),
            PtsRecord::Oriented(OrientedPoint::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0)),
            PtsRecord::Position(PositionPoint::new(4.0, 5.0, 6.0)),
        ]
        .into_iter()
        .collect();

        let mut viewer = CountingViewer::default();
        let handles = build_scene(&points, &ViewerConfig::default(), &mut viewer).unwrap();

        assert_eq!(handles.position_spheres.len(), 2);
        assert_eq!(handles.oriented_spheres.len(), 1);
        assert_eq!(handles.normals.len(), 1);
        assert_eq!(viewer.scene.find("XYZ_sphere_1"), Some(handles.position_spheres[1]));
        assert_eq!(viewer.scene.find("UVW_sphere_0"), Some(handles.oriented_spheres[0]));
        assert_eq!(viewer.scene.find("normal_0"), Some(handles.normals[0]));
        assert_eq!(viewer.pose, Some(CameraPose::from_distance(2.0)));
        assert_eq!(viewer.scene.axes_scale, Some(5.0));
        assert_eq!(viewer.resets, 1);
    }

    #[test]
    fn test_loop_stops_when_viewer_stops() {
        let mut viewer = CountingViewer {
            stop_after: 3,
            ..Default::default()
        };
        let iterations = run_until_closed(&mut viewer, Duration::ZERO, &CancelToken::new()).unwrap();
        assert_eq!(iterations, 3);
    }

    #[test]
    fn test_loop_honours_cancel() {
        let mut viewer = CountingViewer {
            stop_after: usize::MAX,
            ..Default::default()
        };
        let cancel = CancelToken::new();
        cancel.cancel();
        let iterations = run_until_closed(&mut viewer, Duration::ZERO, &cancel).unwrap();
        assert_eq!(iterations, 0);
        assert_eq!(viewer.spins, 0);
    }
}

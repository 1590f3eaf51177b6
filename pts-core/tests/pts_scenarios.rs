use std::io::Write;
use std::time::Duration;

use approx::assert_relative_eq;
use nalgebra::Point3;
use pts_core::{
    build_scene, parse_file, parse_str, run_until_closed, CameraPose, CancelToken, PtsError, Rgb, Scene,
    Shape, ShapeHandle, ShapeKind, Viewer, ViewerConfig,
};
use tempfile::NamedTempFile;

/// Records every call and stops after a fixed number of spins
struct RecordingViewer {
    scene: Scene,
    spins: usize,
    max_spins: usize,
    resets: usize,
}

impl RecordingViewer {
    fn new(max_spins: usize) -> Self {
        Self {
            scene: Scene::new(),
            spins: 0,
            max_spins,
            resets: 0,
        }
    }

    fn spheres(&self) -> Vec<&Shape> {
        self.scene
            .shapes()
            .map(|(_, shape)| shape)
            .filter(|shape| matches!(shape.kind, ShapeKind::Sphere { .. }))
            .collect()
    }

    fn lines(&self) -> Vec<&Shape> {
        self.scene
            .shapes()
            .map(|(_, shape)| shape)
            .filter(|shape| matches!(shape.kind, ShapeKind::Line { .. }))
            .collect()
    }
}

impl Viewer for RecordingViewer {
    type Error = PtsError;

    fn set_background(&mut self, color: Rgb) {
        self.scene.background = color;
    }

    fn show_axes(&mut self, scale: f32) {
        self.scene.axes_scale = Some(scale);
    }

    fn set_camera(&mut self, _pose: &CameraPose) {}

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
        self.spins >= self.max_spins
    }
}

fn write_pts(contents: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", contents).unwrap();
    tmp.flush().unwrap();
    tmp
}

#[test]
fn all_position_lines() {
    let text = (0..25).map(|i| format!("{} {} {}\n", i, i * 2, i * 3)).collect::<String>();
    let outcome = parse_str(&text);

    assert_eq!(outcome.points.positions.len(), 25);
    assert!(outcome.points.oriented.is_empty());
    assert!(outcome.rejected.is_empty());
    assert_eq!(outcome.points.positions[7].position, Point3::new(7.0, 14.0, 21.0));
}

#[test]
fn all_oriented_lines() {
    let text = (0..10).map(|i| format!("{} 0 0 0 0 1\n", i)).collect::<String>();
    let outcome = parse_str(&text);

    assert!(outcome.points.positions.is_empty());
    assert_eq!(outcome.points.oriented.len(), 10);
}

#[test]
fn mixed_file_is_a_stable_partition() {
    let text = "1 1 1\n2 2 2 0 0 1\n3 3 3\n4 4 4 1 0 0\n5 5 5\n";
    let outcome = parse_str(text);

    let xs: Vec<f32> = outcome.points.positions.iter().map(|p| p.position.x).collect();
    assert_eq!(xs, vec![1.0, 3.0, 5.0]);
    let xs: Vec<f32> = outcome.points.oriented.iter().map(|p| p.position.x).collect();
    assert_eq!(xs, vec![2.0, 4.0]);
}

#[test]
fn rejected_counts_produce_one_diagnostic_each() {
    let lines = ["", "1", "1 2", "1 2 3 4", "1 2 3 4 5", "1 2 3 4 5 6 7", "1 2 3 4 5 6 7 8 9"];
    let mut text = lines.join("\n");
    text.push_str("\n1 2 3\n1 2 3 4 5 6\n");

    let outcome = parse_str(&text);
    assert_eq!(outcome.rejected.len(), lines.len());
    assert_eq!(outcome.points.len(), 2);
    assert_eq!(outcome.line_count(), lines.len() + 2);

    let counts: Vec<usize> = outcome.rejected.iter().map(|r| r.token_count).collect();
    assert_eq!(counts, vec![0, 1, 2, 4, 5, 7, 9]);
}

#[test]
fn camera_offsets_follow_distance() {
    for d in [0.5f32, 2.0, 10.0] {
        let (y, z) = CameraPose::offsets(d);
        assert_relative_eq!(y, d * 2f32.sqrt() / 2.0, epsilon = 1e-6);
        assert_relative_eq!(z, -d * 2f32.sqrt() / 2.0, epsilon = 1e-6);
    }
}

#[test]
fn scenario_single_position_point() {
    let tmp = write_pts("1.0 2.0 3.0\n");
    let outcome = parse_file(tmp.path()).unwrap();
    assert_eq!(outcome.points.positions.len(), 1);
    assert!(outcome.points.oriented.is_empty());

    let mut viewer = RecordingViewer::new(1);
    build_scene(&outcome.points, &ViewerConfig::default(), &mut viewer).unwrap();

    let spheres = viewer.spheres();
    assert_eq!(spheres.len(), 1);
    assert!(viewer.lines().is_empty());
    assert_eq!(spheres[0].label, "XYZ_sphere_0");
    assert_eq!(spheres[0].color, Rgb::RED);
    assert_eq!(
        spheres[0].kind,
        ShapeKind::Sphere {
            center: Point3::new(1.0, 2.0, 3.0),
            radius: 0.3
        }
    );
}

#[test]
fn scenario_single_oriented_point() {
    let tmp = write_pts("1 2 3 0 0 1\n");
    let outcome = parse_file(tmp.path()).unwrap();
    assert!(outcome.points.positions.is_empty());
    assert_eq!(outcome.points.oriented.len(), 1);

    let config = ViewerConfig::default();
    let mut viewer = RecordingViewer::new(1);
    build_scene(&outcome.points, &config, &mut viewer).unwrap();

    let spheres = viewer.spheres();
    assert_eq!(spheres.len(), 1);
    assert_eq!(spheres[0].label, "UVW_sphere_0");
    assert_eq!(spheres[0].color, Rgb::GREEN);

    let lines = viewer.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].label, "normal_0");
    assert_eq!(lines[0].color, Rgb::RED);
    match lines[0].kind {
        ShapeKind::Line { from, to, width } => {
            assert_eq!(from, Point3::new(1.0, 2.0, 3.0));
            assert_relative_eq!(to.z, 3.0 + config.normal_scale, epsilon = 1e-6);
            assert_eq!((to.x, to.y), (1.0, 2.0));
            assert_eq!(width, 3.0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn scenario_invalid_line_still_reaches_display_loop() {
    let tmp = write_pts("1 2\n");
    let outcome = parse_file(tmp.path()).unwrap();
    assert!(outcome.points.is_empty());
    assert_eq!(outcome.rejected.len(), 1);

    let mut viewer = RecordingViewer::new(2);
    let handles = build_scene(&outcome.points, &ViewerConfig::default(), &mut viewer).unwrap();
    assert!(handles.is_empty());
    assert_eq!(viewer.resets, 1);

    let iterations = run_until_closed(&mut viewer, Duration::ZERO, &CancelToken::new()).unwrap();
    assert_eq!(iterations, 2);
}

#[test]
fn scenario_missing_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does_not_exist.pts");

    let result = parse_file(&missing);
    assert!(matches!(result, Err(PtsError::Open { ref path, .. }) if *path == missing));
}

#[test]
fn removing_a_shape_by_handle() {
    let outcome = parse_str("0 0 0\n1 1 1\n");
    let mut viewer = RecordingViewer::new(1);
    let handles = build_scene(&outcome.points, &ViewerConfig::default(), &mut viewer).unwrap();

    viewer.remove_shape(handles.position_spheres[0]).unwrap();
    assert_eq!(viewer.spheres().len(), 1);
    assert!(viewer.remove_shape(handles.position_spheres[0]).is_err());
}

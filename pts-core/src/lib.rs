/// PTS Core Library - point file parsing and scene description
///
/// This library holds everything that does not touch a display: the PTS
/// parser, the point model, camera pose math, the scene store and the
/// driver that feeds a [`Viewer`] implementation.

pub mod bounds;
pub mod error;
pub mod point;
pub mod projection;
pub mod pts;
pub mod scene;
pub mod viewer;

// Re-export commonly used types
pub use bounds::Aabb;
pub use error::{PtsError, Result};
pub use point::{OrientedPoint, PointSet, PositionPoint, PtsRecord};
pub use projection::{Camera, CameraPose};
pub use pts::{parse_file, parse_reader, parse_str, ParseOutcome, RejectedLine};
pub use scene::{Rgb, Scene, Shape, ShapeHandle, ShapeKind};
pub use viewer::{build_scene, run_until_closed, CancelToken, SceneHandles, Viewer, ViewerConfig};

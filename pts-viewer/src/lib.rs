/// Terminal-based 3D viewer for PTS point files
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Point3;
use pts_core::{Camera, CameraPose, PtsError, Rgb, Scene, Shape, ShapeHandle, Viewer};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod cli;
pub mod logging;
pub mod renderer;

pub use renderer::{AsciiRenderer, CELL_ASPECT};

use logging::StderrPause;

const ORBIT_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 0.9;

/// Errors raised while driving the terminal viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error(transparent)]
    Scene(#[from] PtsError),
}

/// Interactive viewer drawing into the terminal's alternate screen
pub struct TerminalViewer {
    scene: Scene,
    camera: Camera,
    renderer: AsciiRenderer,
    status: String,
    stopped: bool,
    raw_mode: bool,
    log_pause: Option<StderrPause>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalViewer {
    /// Viewer with a `width` x `height` cell grid that does not touch the terminal
    pub fn with_size(width: u16, height: u16) -> Self {
        let mut camera = Camera::new(width as u32, height as u32);
        camera.aspect = cell_aspect(width, height);

        Self {
            scene: Scene::new(),
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            status: String::new(),
            stopped: false,
            raw_mode: false,
            log_pause: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Take over the terminal: raw mode, alternate screen, hidden cursor.
    ///
    /// Log output to stderr is paused while the viewer owns the terminal.
    /// Both are restored when the viewer is dropped.
    pub fn open() -> Result<Self, ViewerError> {
        let (width, height) = terminal::size()?;
        tracing::debug!(width, height, "opening terminal viewer");

        let mut viewer = Self::with_size(width, height);
        viewer.log_pause = Some(logging::pause_stderr());

        terminal::enable_raw_mode()?;
        viewer.raw_mode = true;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(viewer)
    }

    /// Text shown in the status line next to the key help
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    /// Apply one input event to the camera or the stopped flag
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(KeyEvent {
                code, modifiers, kind, ..
            }) if *kind != KeyEventKind::Release => match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.stopped = true;
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.stopped = true;
                }
                KeyCode::Char('w') | KeyCode::Up => {
                    self.camera.orbit(0.0, ORBIT_STEP);
                }
                KeyCode::Char('s') | KeyCode::Down => {
                    self.camera.orbit(0.0, -ORBIT_STEP);
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.camera.orbit(-ORBIT_STEP, 0.0);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.camera.orbit(ORBIT_STEP, 0.0);
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.camera.zoom(ZOOM_STEP);
                }
                KeyCode::Char('-') => {
                    self.camera.zoom(1.0 / ZOOM_STEP);
                }
                KeyCode::Char('r') => {
                    self.reset_camera();
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                self.renderer.resize(*width as usize, *height as usize);
                self.camera.aspect = cell_aspect(*width, *height);
            }
            _ => {}
        }
    }

    /// Rasterize the scene and write one frame to `out`
    pub fn render_frame<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_scene(&self.scene, &self.camera);

        queue!(out, cursor::MoveTo(0, 0))?;
        self.renderer.draw(out, self.scene.background)?;

        let mut overlay = format!(
            "PTS Viewer | FPS: {:.1} | WASD/Arrows=Orbit +/-=Zoom R=Reset Q=Quit",
            self.fps
        );
        if !self.status.is_empty() {
            overlay = format!("{} | {}", overlay, self.status);
        }
        let overlay: String = overlay.chars().take(self.renderer.width()).collect();

        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(overlay),
            ResetColor
        )?;

        out.flush()
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_frame).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
            self.frame_count = 0;
            self.last_frame = now;
        }
    }
}

impl Viewer for TerminalViewer {
    type Error = ViewerError;

    fn set_background(&mut self, color: Rgb) {
        self.scene.background = color;
    }

    fn show_axes(&mut self, scale: f32) {
        self.scene.axes_scale = Some(scale);
    }

    fn set_camera(&mut self, pose: &CameraPose) {
        self.camera.set_pose(pose);
    }

    fn add_sphere(&mut self, center: Point3<f32>, radius: f32, color: Rgb, label: &str) -> ShapeHandle {
        self.scene.add(Shape::sphere(center, radius, color, label))
    }

    fn add_line(&mut self, from: Point3<f32>, to: Point3<f32>, color: Rgb, label: &str) -> ShapeHandle {
        self.scene.add(Shape::line(from, to, color, label))
    }

    fn set_line_width(&mut self, handle: ShapeHandle, width: f32) -> Result<(), ViewerError> {
        Ok(self.scene.set_line_width(handle, width)?)
    }

    fn remove_shape(&mut self, handle: ShapeHandle) -> Result<(), ViewerError> {
        self.scene.remove(handle)?;
        Ok(())
    }

    fn reset_camera(&mut self) {
        self.camera.reset_to_bounds(&self.scene.bounds());
    }

    fn spin_once(&mut self, timeout: Duration) -> Result<(), ViewerError> {
        if event::poll(timeout)? {
            // Drain everything queued so held keys do not lag behind
            loop {
                let event = event::read()?;
                self.handle_event(&event);
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if !self.stopped {
            let mut out = stdout();
            self.render_frame(&mut out)?;
            self.update_fps();
        }
        Ok(())
    }

    fn was_stopped(&self) -> bool {
        self.stopped
    }
}

impl Drop for TerminalViewer {
    fn drop(&mut self) {
        if self.raw_mode {
            // Cleanup
            let _ = terminal::disable_raw_mode();
            let _ = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        }
    }
}

fn cell_aspect(width: u16, height: u16) -> f32 {
    width as f32 * CELL_ASPECT / height.max(1) as f32
}

/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector3};
use pts_core::{Camera, Rgb, Scene, ShapeKind};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Width of a terminal cell relative to its height
pub const CELL_ASPECT: f32 = 0.5;

/// ASCII renderer that rasterizes scene shapes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Option<Rgb>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![None; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(None);
    }

    /// Character and colour at a cell, `None` outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Option<Rgb>)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    /// Number of cells covered by any shape
    pub fn covered_cells(&self) -> usize {
        self.color_buffer.iter().filter(|c| c.is_some()).count()
    }

    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        if let Some(axes) = scene.axes() {
            for (axis, color) in axes {
                self.render_line(&Point3::origin(), &Point3::from(axis), 1.0, color, camera);
            }
        }

        for (_, shape) in scene.shapes() {
            match shape.kind {
                ShapeKind::Sphere { center, radius } => self.render_sphere(&center, radius, shape.color, camera),
                ShapeKind::Line { from, to, width } => self.render_line(&from, &to, width, shape.color, camera),
            }
        }
    }

    fn render_sphere(&mut self, center: &Point3<f32>, radius: f32, color: Rgb, camera: &Camera) {
        let Some((sx, sy, depth)) = camera.project_to_screen(center, self.width as u32, self.height as u32) else {
            return;
        };

        // Screen-space radii; keep at least one cell so far points stay visible
        let rows = (camera.rows_per_unit(depth, self.height as u32) * radius).max(0.5);
        let cols = (rows * self.width as f32 / (self.height as f32 * camera.aspect)).max(0.5);

        let min_x = ((sx - cols).floor() as i32).max(0);
        let max_x = ((sx + cols).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((sy - rows).floor() as i32).max(0);
        let max_y = ((sy + rows).ceil() as i32).min(self.height as i32 - 1);

        let light = Vector3::new(-0.4, 0.5, 0.77).normalize();

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = (x as f32 + 0.5 - sx) / cols;
                let dy = (y as f32 + 0.5 - sy) / rows;
                let d2 = dx * dx + dy * dy;
                if d2 > 1.0 {
                    continue;
                }

                let nz = (1.0 - d2).sqrt();
                let normal = Vector3::new(dx, -dy, nz);
                let brightness = normal.dot(&light).max(0.0);

                let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
                let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

                self.plot(x, y, depth - nz * radius, character, color.shade(0.35 + 0.65 * brightness));
            }
        }
    }

    fn render_line(&mut self, from: &Point3<f32>, to: &Point3<f32>, width: f32, color: Rgb, camera: &Camera) {
        let (Some(a), Some(b)) = clip_to_near(camera.to_view(from), camera.to_view(to), camera.near) else {
            return;
        };
        let (Some(a), Some(b)) = (
            camera.project_view(&a, self.width as u32, self.height as u32),
            camera.project_view(&b, self.width as u32, self.height as u32),
        ) else {
            return;
        };

        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let character = line_glyph(dx, dy);
        let half = ((width - 1.0) / 2.0).round().clamp(0.0, 3.0) as i32;

        // Cap the step count so a line crossing far off screen stays cheap
        let steps = dx.abs().max(dy.abs()).ceil().clamp(1.0, 4096.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (a.0 + dx * t).floor() as i32;
            let y = (a.1 + dy * t).floor() as i32;
            let depth = a.2 + (b.2 - a.2) * t;

            for oy in -half..=half {
                for ox in -half..=half {
                    self.plot(x + ox, y + oy, depth, character, color);
                }
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = Some(color);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W, background: Rgb) -> std::io::Result<()> {
        let background = to_color(background);
        writer.queue(SetBackgroundColor(background))?;

        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx].map(to_color).unwrap_or(background);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Pick a stroke character for a screen-space direction
fn line_glyph(dx: f32, dy: f32) -> char {
    // Cells are twice as tall as wide, so compare against half the rise
    let (ax, ay) = (dx.abs(), dy.abs() * 2.0);
    if ax > ay * 2.0 {
        '-'
    } else if ay > ax * 2.0 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Clip a view-space segment against the near plane (`z = -near`)
fn clip_to_near(a: Point3<f32>, b: Point3<f32>, near: f32) -> (Option<Point3<f32>>, Option<Point3<f32>>) {
    let plane = -near;
    match (a.z <= plane, b.z <= plane) {
        (true, true) => (Some(a), Some(b)),
        (false, false) => (None, None),
        (a_visible, _) => {
            let t = (plane - a.z) / (b.z - a.z);
            let hit = a + (b - a) * t;
            if a_visible {
                (Some(a), Some(hit))
            } else {
                (Some(hit), Some(b))
            }
        }
    }
}

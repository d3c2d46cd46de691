/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use fleur_core::{Camera, FlowerScene, LineSegment, Mesh, Rgb};
use nalgebra::{Matrix4, Point3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Minimum colour brightness so surfaces facing away keep their hue
const AMBIENT: f32 = 0.35;

/// Lines longer than this (in cells) are dropped; their endpoints are near the camera plane
const MAX_LINE_STEPS: i64 = 10_000;

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    background: Rgb,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            background: Rgb::SKY_BLUE,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::SKY_BLUE; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            background: self.background,
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self, background: Rgb) {
        self.background = background;
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(background);
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.color_buffer[y * self.width + x])
    }

    /// Number of cells something was drawn into
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    /// Clear to the scene background and draw every node and helper line
    pub fn render_scene(&mut self, scene: &FlowerScene, camera: &Camera) {
        self.clear(scene.background);
        for node in &scene.nodes {
            let model = scene.node_matrix(node);
            self.render_mesh(&node.mesh, &model, node.color, camera);
        }
        for line in &scene.helpers {
            self.render_line(line, camera);
        }
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, color: Rgb, camera: &Camera) {
        let mvp = camera.view_projection() * model_matrix;
        let (width, height) = (self.width as u32, self.height as u32);

        'triangles: for triangle in &mesh.triangles {
            // Project vertices to screen space
            let mut screen_coords = [(0.0, 0.0, 0.0); 3];
            for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
                match camera.project_with(&mvp, &vertex.position, width, height) {
                    Some(projected) => *coord = projected,
                    None => continue 'triangles, // Triangle is clipped
                }
            }

            // Two-sided headlight shading in world space
            let normal = model_matrix.transform_vector(&triangle.smooth_normal());
            let centroid = model_matrix.transform_point(&Point3::from(
                (triangle.vertices[0].position.coords
                    + triangle.vertices[1].position.coords
                    + triangle.vertices[2].position.coords)
                    / 3.0,
            ));
            let view_dir = (camera.position - centroid).normalize();
            let brightness = normal.normalize().dot(&view_dir).abs();

            // Map brightness to character, skipping the blank
            let last = LUMINOSITY_RAMP.len() - 1;
            let char_index = 1 + (brightness * (last - 1) as f32) as usize;
            let character = LUMINOSITY_RAMP[char_index.min(last)];
            let shaded = color.shade(AMBIENT + (1.0 - AMBIENT) * brightness);

            self.rasterize_triangle(&screen_coords, character, shaded);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Rgb) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i64).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i64).min(self.width as i64 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i64).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    return;
                };
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x as usize, y as usize, depth, character, color);
                }
            }
        }
    }

    /// Draw an unlit line with Bresenham's algorithm, depth tested
    pub fn render_line(&mut self, line: &LineSegment, camera: &Camera) {
        let (width, height) = (self.width as u32, self.height as u32);
        let identity = Matrix4::identity();
        let (Some(start), Some(end)) = (
            camera.project_to_screen(&line.start, &identity, width, height),
            camera.project_to_screen(&line.end, &identity, width, height),
        ) else {
            return;
        };

        let character = line_char(end.0 - start.0, end.1 - start.1);
        let (mut x0, mut y0) = (start.0.floor() as i64, start.1.floor() as i64);
        let (x1, y1) = (end.0.floor() as i64, end.1.floor() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        if dx.max(-dy) > MAX_LINE_STEPS {
            return;
        }
        let steps = dx.max(-dy).max(1) as f32;
        let mut err = dx + dy;
        let mut step = 0.0;

        loop {
            if x0 >= 0 && y0 >= 0 && (x0 as usize) < self.width && (y0 as usize) < self.height {
                let t = (step / steps).min(1.0);
                let depth = start.2 + (end.2 - start.2) * t;
                self.plot(x0 as usize, y0 as usize, depth, character, line.color);
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1.0;
        }
    }

    fn plot(&mut self, x: usize, y: usize, depth: f32, character: char, color: Rgb) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_color(self.background)))?;
        let mut current = None;
        for y in 0..self.height {
            writer.queue(MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(to_color(color)))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a line character from the on-screen direction (y grows downwards)
fn line_char(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax > 2.0 * ay {
        '-'
    } else if ay > 2.0 * ax {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

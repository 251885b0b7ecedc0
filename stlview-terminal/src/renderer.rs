/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use std::io::Write;
use stlview_core::{Camera, Scene, Tint, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// What fills cells no triangle covers. `Passthrough` is the AR-mode
/// stand-in: a faint dot field instead of the camera feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Solid,
    Passthrough,
}

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    color: Color,
}

const EMPTY_CELL: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

/// Renders scene nodes into character + depth buffers, then flushes them to
/// a terminal writer.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    backdrop: Backdrop,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            backdrop: Backdrop::Solid,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY_CELL; size],
        }
    }

    pub fn set_backdrop(&mut self, backdrop: Backdrop) {
        self.backdrop = backdrop;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY_CELL);

        if self.backdrop == Backdrop::Passthrough {
            for y in 0..self.height {
                for x in 0..self.width {
                    if (x + y * 3) % 7 == 0 {
                        self.cells[y * self.width + x] = Cell {
                            glyph: '\u{b7}', // middle dot
                            color: Color::DarkGrey,
                        };
                    }
                }
            }
        }
    }

    /// Render every node of the scene. The per-node model matrix composes
    /// the shared base transform with the scene's recentering, root scale,
    /// and node scale.
    pub fn render_scene(&mut self, scene: &Scene, base_matrix: &Matrix4<f32>, camera: &Camera) {
        for (index, node) in scene.nodes.iter().enumerate() {
            let Some(mesh) = &node.mesh else { continue };
            let model = base_matrix * scene.node_matrix(index);
            for triangle in &mesh.triangles {
                self.render_triangle(triangle, &model, camera, node.tint);
            }
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        tint: Tint,
    ) {
        // Project vertices to screen space; skip clipped triangles whole.
        let mut screen_coords = [(0.0f32, 0.0f32, 0.0f32); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return,
            }
        }

        // Flat shading from the face normal
        let normal = triangle.calculate_normal();
        let light_dir = nalgebra::Vector3::new(0.0, 0.0, 1.0);
        let brightness = normal.dot(&light_dir).abs().clamp(0.0, 1.0);

        let ramp_index = ((brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize)
            .min(LUMINOSITY_RAMP.len() - 1);
        let cell = Cell {
            glyph: LUMINOSITY_RAMP[ramp_index],
            color: shaded_color(tint, brightness),
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Clipped screen-space bounding box
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        writer.queue(ResetColor)?;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if cell.color != current {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = cell.color;
                }
                writer.queue(Print(cell.glyph))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Fraction of cells covered by geometry, for tests and debugging.
    pub fn coverage(&self) -> f32 {
        let covered = self
            .depth_buffer
            .iter()
            .filter(|d| d.is_finite())
            .count();
        covered as f32 / self.depth_buffer.len().max(1) as f32
    }
}

fn shaded_color(tint: Tint, brightness: f32) -> Color {
    // Keep a floor so faces at grazing angles stay visible.
    let level = 0.35 + 0.65 * brightness;
    let (r, g, b) = Tint::new(tint.r * level, tint.g * level, tint.b * level).to_rgb8();
    Color::Rgb { r, g, b }
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

#[cfg(test)]
mod tests {
    use super::*;
    use stlview_core::Mesh;

    #[test]
    fn cube_covers_screen_center() {
        let scene = Scene::from_mesh("cube", Mesh::cube(2.0));
        let camera = Camera::new(60, 30);
        let mut renderer = AsciiRenderer::new(60, 30);

        renderer.clear();
        renderer.render_scene(&scene, &Matrix4::identity(), &camera);
        assert!(renderer.coverage() > 0.05);

        let center = renderer.cells[15 * 60 + 30];
        assert_ne!(center.glyph, ' ');
    }

    #[test]
    fn clear_resets_coverage() {
        let scene = Scene::from_mesh("cube", Mesh::cube(2.0));
        let camera = Camera::new(40, 20);
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.clear();
        renderer.render_scene(&scene, &Matrix4::identity(), &camera);
        renderer.clear();
        assert_eq!(renderer.coverage(), 0.0);
    }

    #[test]
    fn passthrough_backdrop_fills_empty_cells() {
        let mut renderer = AsciiRenderer::new(20, 10);
        renderer.set_backdrop(Backdrop::Passthrough);
        renderer.clear();
        assert!(renderer.cells.iter().any(|c| c.glyph != ' '));
        // Backdrop leaves the depth buffer untouched.
        assert_eq!(renderer.coverage(), 0.0);
    }

    #[test]
    fn draw_emits_output() {
        let scene = Scene::from_mesh("cube", Mesh::cube(2.0));
        let camera = Camera::new(30, 15);
        let mut renderer = AsciiRenderer::new(30, 15);
        renderer.clear();
        renderer.render_scene(&scene, &Matrix4::identity(), &camera);

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }
}

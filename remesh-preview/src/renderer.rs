//! Software wireframe rasterizer

use crate::camera::Camera;
use image::{Rgba, RgbaImage};
use remesh_core::PolygonMesh;

/// Wire colour of preview images, as linear RGB in [0, 1]
pub const WIRE_COLOR: [f32; 3] = [0.2, 0.8, 1.0];

/// Renders the edges of a mesh onto a transparent image
#[derive(Debug, Clone)]
pub struct WireframeRenderer {
    pub width: u32,
    pub height: u32,
    pub color: Rgba<u8>,
}

impl WireframeRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: to_rgba(WIRE_COLOR),
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = to_rgba(color);
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Draw every unique edge of `mesh` as seen from `camera`
    pub fn render(&self, mesh: &PolygonMesh, camera: &Camera) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 0]));
        let projected: Vec<Option<(f32, f32)>> = mesh
            .vertices
            .iter()
            .map(|v| camera.project(v, self.width, self.height))
            .collect();

        for (a, b) in mesh.edges() {
            if let (Some(Some(p)), Some(Some(q))) = (projected.get(a), projected.get(b)) {
                self.draw_line(&mut image, *p, *q);
            }
        }
        image
    }

    /// Bresenham line, clipped to the image bounds per pixel
    fn draw_line(&self, image: &mut RgbaImage, from: (f32, f32), to: (f32, f32)) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

        // Skip lines that are wildly off-screen
        let limit = 4 * (self.width.max(self.height) as i64);
        if [x0, y0, x1, y1].iter().any(|c| c.abs() > limit) {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x0 >= 0 && y0 >= 0 && (x0 as u32) < self.width && (y0 as u32) < self.height {
                image.put_pixel(x0 as u32, y0 as u32, self.color);
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
        }
    }
}

fn to_rgba(color: [f32; 3]) -> Rgba<u8> {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([channel(color[0]), channel(color[1]), channel(color[2]), 255])
}

//! Wireframe preview images for remesh
//!
//! Previews are drawn before and after reduction so the two can be compared
//! side by side. They never affect the reduction itself.

pub mod camera;
pub mod renderer;

pub use camera::*;
pub use renderer::*;

use remesh_core::{Error, PolygonMesh, Result};
use std::path::Path;
use tracing::debug;

/// Preview image width in pixels
pub const PREVIEW_WIDTH: u32 = 800;

/// Preview image height in pixels
pub const PREVIEW_HEIGHT: u32 = 600;

/// Render an 800x600 wireframe PNG of `mesh` to `path`
pub fn render_preview<P: AsRef<Path>>(mesh: &PolygonMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    mesh.validate()?;

    let renderer = WireframeRenderer::new(PREVIEW_WIDTH, PREVIEW_HEIGHT);
    let camera = Camera::framing(mesh, renderer.aspect_ratio());
    let image = renderer.render(mesh, &camera);

    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| Error::Visualization(format!("Failed to save {}: {}", path.display(), e)))?;

    debug!(path = %path.display(), edges = mesh.edges().len(), "Saved preview");
    Ok(())
}

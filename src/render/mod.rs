//! Visual renderer: a `vello_cpu` drawing surface and the scene drawn onto it.

/// The animated scene.
pub mod scene;
/// Drawing surface and frame type.
pub mod surface;
/// Font resolution and text shaping.
pub mod text;

use crate::config::GeneratorConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::GenResult;
use crate::render::scene::Scene;
use crate::render::surface::{DrawingSurface, FrameRGBA};
use crate::render::text::FontSet;

/// Render a single still of the scene at `t` seconds, for previews.
#[tracing::instrument(skip(fonts), fields(theme = %config.theme))]
pub fn render_still(
    config: &GeneratorConfig,
    canvas: Canvas,
    fonts: FontSet,
    t: f64,
) -> GenResult<FrameRGBA> {
    let mut surface = DrawingSurface::acquire(canvas, fonts)?;
    Scene::new(config.theme).draw(&mut surface, t)?;
    Ok(surface.snapshot())
}

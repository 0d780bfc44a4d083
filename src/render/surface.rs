use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{GenError, GenResult};
use crate::render::text::{FontRole, FontSet, TextLayout, TextLayoutEngine};
use std::sync::Arc;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert premultiplied pixels to straight alpha; a no-op for straight frames.
    pub fn into_straight_alpha(mut self) -> Self {
        if !self.premultiplied {
            return self;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
        self
    }
}

/// How glyphs of a text run are colored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum TextPaint {
    Solid(Rgba8),
    /// Left-to-right gradient across the run, sampled at each glyph center.
    Horizontal(Rgba8, Rgba8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GradientKey {
    start: [u8; 4],
    end: [u8; 4],
}

/// Offscreen pixel buffer the scene is drawn into, sampled once per frame by the recorder.
pub struct DrawingSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: TextLayoutEngine,
    gradient: Option<(GradientKey, vello_cpu::Image)>,
}

impl DrawingSurface {
    /// Create the render context and backing pixmap.
    ///
    /// Fails with [`GenError::SurfaceUnavailable`] when the size cannot be rasterized.
    pub fn acquire(canvas: Canvas, fonts: FontSet) -> GenResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(GenError::surface(format!(
                "surface must be non-empty, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| GenError::surface("surface width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| GenError::surface("surface height exceeds u16"))?;

        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            text: TextLayoutEngine::new(fonts),
            gradient: None,
        })
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Start a new frame. Everything drawn before is discarded on [`Self::end_frame`].
    pub(crate) fn begin_frame(&mut self) {
        self.ctx.reset();
    }

    /// Rasterize the recorded draw calls into the pixmap.
    pub(crate) fn end_frame(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
    }

    /// Premultiplied RGBA8 bytes of the last finished frame.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Copy of the last finished frame.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixels().to_vec(),
            premultiplied: true,
        }
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, transform: Affine, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Cover the whole surface with a linear gradient from the top-left to the bottom-right corner.
    pub(crate) fn fill_diagonal_gradient(&mut self, start: Rgba8, end: Rgba8) -> GenResult<()> {
        let key = GradientKey {
            start: start.to_premul_bytes(),
            end: end.to_premul_bytes(),
        };
        let image = match &self.gradient {
            Some((k, img)) if *k == key => img.clone(),
            _ => {
                let img = diagonal_gradient_image(self.canvas, start, end)?;
                self.gradient = Some((key, img.clone()));
                img
            }
        };
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(image);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            self.canvas.w(),
            self.canvas.h(),
        ));
        Ok(())
    }

    /// Shape text; `None` when no font is available.
    pub(crate) fn layout_text(
        &mut self,
        role: FontRole,
        text: &str,
        size_px: u32,
    ) -> GenResult<Option<TextLayout>> {
        self.text.layout(role, text, size_px)
    }

    /// Paint a shaped run with its top-left corner at `origin`.
    pub(crate) fn fill_text(&mut self, text: &TextLayout, origin: Point, paint: TextPaint) {
        let width = text.width().max(1.0);
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in text.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font_size = run.run().font_size();
                // Positions are relative to the layout's top-left, baseline included.
                for g in run.positioned_glyphs() {
                    let color = glyph_color(paint, f64::from(g.x + g.advance / 2.0), width);
                    self.ctx.set_paint(color_to_cpu(color));
                    self.ctx
                        .glyph_run(&text.font)
                        .font_size(font_size)
                        .fill_glyphs(std::iter::once(vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        }));
                }
            }
        }
    }
}

/// Color of a glyph whose center sits `center_x` pixels into a run `width` pixels wide.
fn glyph_color(paint: TextPaint, center_x: f64, width: f64) -> Rgba8 {
    match paint {
        TextPaint::Solid(c) => c,
        TextPaint::Horizontal(a, b) => a.lerp(b, center_x / width),
    }
}

fn diagonal_gradient_image(canvas: Canvas, start: Rgba8, end: Rgba8) -> GenResult<vello_cpu::Image> {
    let (w, h) = (canvas.w(), canvas.h());
    let len2 = w * w + h * h;
    let mut bytes = vec![0u8; canvas.rgba_len()];
    for (y, row) in bytes
        .chunks_exact_mut(canvas.width as usize * 4)
        .enumerate()
    {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            // Projection of the pixel center onto the (0,0)->(w,h) axis.
            let t = ((x as f64 + 0.5) * w + (y as f64 + 0.5) * h) / len2;
            px.copy_from_slice(&start.lerp(end, t).to_premul_bytes());
        }
    }
    let pixmap = pixmap_from_premul_bytes(&bytes, canvas.width, canvas.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> GenResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GenError::surface("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GenError::surface("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(GenError::surface("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

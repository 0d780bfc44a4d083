//! The animated scene: gradient background with confetti, a bouncing face and a wobbling caption.
//!
//! Every helper here is a pure function of the elapsed time `t` (seconds), the canvas and the
//! theme; nothing is randomized per frame, so the same `t` always draws the same pixels.

use crate::config::Theme;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::GenResult;
use crate::foundation::math::{hsl, wrap};
use crate::render::surface::{DrawingSurface, TextPaint};
use crate::render::text::FontRole;
use kurbo::Shape as _;
use std::f64::consts::{PI, TAU};

/// Glyphs cycled on the face, two per second.
pub const FACES: [&str; 7] = ["😂", "🤪", "😜", "🥳", "😎", "🤡", "🙃"];

/// Captions cycled at the bottom, one every 1.6 seconds.
pub const CAPTIONS: [&str; 5] = [
    "Quando o café bate...",
    "Modo dev: on",
    "Deploy na sexta!",
    "Só mais um console.log",
    "Bug? Feature surpresa!",
];

/// Number of confetti sprites.
pub const CONFETTI_COUNT: usize = 70;

const CAPTION_SECS: f64 = 1.6;
const CAPTION_FONT_PX: u32 = 40;
const CAPTION_PAD: f64 = 16.0;
const CAPTION_BOX_HEIGHT: f64 = 56.0;
const CAPTION_CORNER_RADIUS: f64 = 10.0;
const SHADOW_ALPHA: f64 = 0.15;
const OUTLINE_STEPS: u32 = 72;

fn non_negative(t: f64) -> f64 {
    if t.is_finite() { t.max(0.0) } else { 0.0 }
}

/// Index into [`FACES`] at time `t`: `floor(2t) mod 7`.
pub fn face_index(t: f64) -> usize {
    (non_negative(t) * 2.0).floor() as u64 as usize % FACES.len()
}

/// Index into [`CAPTIONS`] at time `t`: `floor(t / 1.6) mod 5`.
pub fn caption_index(t: f64) -> usize {
    (non_negative(t) / CAPTION_SECS).floor() as u64 as usize % CAPTIONS.len()
}

/// Gradient stops of the background at time `t`.
pub fn background_stops(theme: Theme, t: f64) -> (Rgba8, Rgba8) {
    match theme {
        Theme::Colorido => (
            hsl(wrap(t * 40.0, 360.0), 1.0, 0.95),
            hsl(wrap(t * 40.0 + 120.0, 360.0), 1.0, 0.88),
        ),
        Theme::Pastel => (
            hsl(wrap(t * 20.0, 360.0), 0.7, 0.96),
            hsl(wrap(t * 20.0 + 60.0, 360.0), 0.7, 0.90),
        ),
        Theme::Escuro => (Rgba8::rgb(0x11, 0x18, 0x27), Rgba8::rgb(0x1f, 0x29, 0x37)),
    }
}

/// One confetti rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfettiSprite {
    /// Center of the sprite.
    pub center: Point,
    /// Rotation in radians.
    pub angle_rad: f64,
    /// Fill color.
    pub color: Rgba8,
}

impl ConfettiSprite {
    /// Local-space rectangle, 6×16 centered on the origin.
    pub fn shape() -> Rect {
        Rect::new(-3.0, -8.0, 3.0, 8.0)
    }

    /// Object-to-canvas transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.center.to_vec2()) * Affine::rotate(self.angle_rad)
    }
}

/// Sprite `i` at time `t`. Positions drift diagonally and wrap 30 px outside the canvas.
pub fn confetti_sprite(i: usize, t: f64, canvas: Canvas) -> ConfettiSprite {
    let fi = i as f64;
    let x = wrap(fi * 97.0 + t * 120.0, canvas.w() + 60.0) - 30.0;
    let y = wrap(fi * 53.0 + t * 80.0, canvas.h() + 60.0) - 30.0;
    ConfettiSprite {
        center: Point::new(x, y),
        angle_rad: ((i * 17) % 360) as f64 * PI / 180.0,
        color: hsl(((i * 22) % 360) as f64, 0.9, 0.6),
    }
}

/// Position and size of the face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FacePose {
    /// Circle center.
    pub center: Point,
    /// Circle radius.
    pub radius: f64,
}

/// Face at time `t`: Lissajous-style drift around the canvas center with a breathing radius.
pub fn face_pose(t: f64, canvas: Canvas) -> FacePose {
    FacePose {
        center: Point::new(
            canvas.w() / 2.0 + (t * 3.0).sin() * 220.0,
            canvas.h() / 2.0 + (t * 2.2).cos() * 120.0,
        ),
        radius: 80.0 + (t * 2.0).sin() * 6.0,
    }
}

/// Closed outline around the face whose radius ripples with angle and time.
pub fn wiggle_outline(pose: FacePose, t: f64) -> BezPath {
    let mut path = BezPath::new();
    for k in 0..OUTLINE_STEPS {
        let a = f64::from(k) * TAU / f64::from(OUTLINE_STEPS);
        let rr = pose.radius + (a * 8.0 + t * 8.0).sin() * 6.0;
        let p = Point::new(pose.center.x + a.cos() * rr, pose.center.y + a.sin() * rr);
        if k == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// Outline color at time `t`.
pub fn outline_color(t: f64) -> Rgba8 {
    hsl(wrap(t * 100.0, 360.0), 1.0, 0.5)
}

/// Center of the caption box at time `t`.
pub fn caption_anchor(t: f64, canvas: Canvas) -> Point {
    let wobble = (t * 6.0).sin() * 6.0;
    Point::new(canvas.w() / 2.0, canvas.h() - 80.0 + wobble)
}

/// Caption box of `text_width` centered on `anchor`.
pub fn caption_box(anchor: Point, text_width: f64) -> Rect {
    let tw = text_width + CAPTION_PAD * 2.0;
    Rect::from_center_size(anchor, (tw, CAPTION_BOX_HEIGHT))
}

/// Theme-dependent accent colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Face fill.
    pub face: Rgba8,
    /// Caption box fill.
    pub box_fill: Rgba8,
    /// Caption box border.
    pub box_stroke: Rgba8,
    /// Caption text gradient, left to right.
    pub text: (Rgba8, Rgba8),
}

impl Palette {
    /// Accent colors for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        if theme.is_dark() {
            Self {
                face: Rgba8::rgb(0xff, 0xd1, 0x66),
                box_fill: Rgba8::rgb(0x11, 0x18, 0x27),
                box_stroke: Rgba8::rgb(0xf5, 0x9e, 0x0b),
                text: (Rgba8::rgb(0xf5, 0x9e, 0x0b), Rgba8::rgb(0xfd, 0xe6, 0x8a)),
            }
        } else {
            Self {
                face: Rgba8::rgb(0xfd, 0xe6, 0x8a),
                box_fill: Rgba8::rgb(0xff, 0xff, 0xff),
                box_stroke: Rgba8::rgb(0xfb, 0xbf, 0x24),
                text: (Rgba8::rgb(0xef, 0x44, 0x44), Rgba8::rgb(0xf5, 0x9e, 0x0b)),
            }
        }
    }
}

fn shadow() -> Rgba8 {
    Rgba8::rgb(0, 0, 0).with_alpha(SHADOW_ALPHA)
}

/// Rough advance for text drawn without a font, so the caption box keeps a sensible size.
fn estimated_text_width(text: &str, size_px: u32) -> f64 {
    text.chars().count() as f64 * f64::from(size_px) * 0.55
}

/// Draws the full scene for a theme.
#[derive(Clone, Copy, Debug)]
pub struct Scene {
    theme: Theme,
    palette: Palette,
}

impl Scene {
    /// Scene for `theme`.
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            palette: Palette::for_theme(theme),
        }
    }

    /// Draw one frame at `t` seconds: background, then face, then caption.
    pub fn draw(&self, surface: &mut DrawingSurface, t: f64) -> GenResult<()> {
        let t = non_negative(t);
        surface.begin_frame();
        self.draw_background(surface, t)?;
        self.draw_face(surface, t)?;
        self.draw_caption(surface, t)?;
        surface.end_frame();
        Ok(())
    }

    fn draw_background(&self, surface: &mut DrawingSurface, t: f64) -> GenResult<()> {
        let (start, end) = background_stops(self.theme, t);
        surface.fill_diagonal_gradient(start, end)?;

        let canvas = surface.canvas();
        for i in 0..CONFETTI_COUNT {
            let sprite = confetti_sprite(i, t, canvas);
            surface.fill_rect(ConfettiSprite::shape(), sprite.transform(), sprite.color);
        }
        Ok(())
    }

    fn draw_face(&self, surface: &mut DrawingSurface, t: f64) -> GenResult<()> {
        let pose = face_pose(t, surface.canvas());
        let r = pose.radius;

        let shadow_circle =
            kurbo::Circle::new((pose.center.x + 10.0, pose.center.y + 10.0), r * 1.02);
        surface.fill_path(&shadow_circle.to_path(0.1), shadow());
        surface.fill_path(
            &kurbo::Circle::new(pose.center, r).to_path(0.1),
            self.palette.face,
        );

        let size_px = (r * 1.2).floor().max(1.0) as u32;
        if let Some(glyph) = surface.layout_text(FontRole::Emoji, FACES[face_index(t)], size_px)? {
            let origin = Point::new(
                pose.center.x - glyph.width() / 2.0,
                pose.center.y - glyph.height() / 2.0,
            );
            surface.fill_text(&glyph, origin, TextPaint::Solid(Rgba8::rgb(0, 0, 0)));
        }

        surface.stroke_path(&wiggle_outline(pose, t), 6.0, outline_color(t));
        Ok(())
    }

    fn draw_caption(&self, surface: &mut DrawingSurface, t: f64) -> GenResult<()> {
        let text = CAPTIONS[caption_index(t)];
        let anchor = caption_anchor(t, surface.canvas());
        let layout = surface.layout_text(FontRole::Text, text, CAPTION_FONT_PX)?;
        let text_width = layout
            .as_ref()
            .map(|l| l.width())
            .unwrap_or_else(|| estimated_text_width(text, CAPTION_FONT_PX));

        let rect = caption_box(anchor, text_width);
        let rounded = |r: Rect| kurbo::RoundedRect::from_rect(r, CAPTION_CORNER_RADIUS).to_path(0.1);

        surface.fill_path(&rounded(rect + kurbo::Vec2::new(3.0, 3.0)), shadow());
        surface.fill_path(&rounded(rect), self.palette.box_fill);
        surface.stroke_path(&rounded(rect), 2.0, self.palette.box_stroke);

        if let Some(layout) = layout {
            let origin = Point::new(
                anchor.x - layout.width() / 2.0,
                anchor.y + 2.0 - layout.height() / 2.0,
            );
            let (a, b) = self.palette.text;
            surface.fill_text(&layout, origin, TextPaint::Horizontal(a, b));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;

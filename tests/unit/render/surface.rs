use super::*;

fn small() -> DrawingSurface {
    DrawingSurface::acquire(
        Canvas {
            width: 64,
            height: 36,
        },
        FontSet::empty(),
    )
    .unwrap()
}

fn px(s: &DrawingSurface, x: usize, y: usize) -> [u8; 4] {
    let i = (y * s.canvas().width as usize + x) * 4;
    s.pixels()[i..i + 4].try_into().unwrap()
}

#[test]
fn acquire_rejects_unrasterizable_sizes() {
    let zero = DrawingSurface::acquire(
        Canvas {
            width: 0,
            height: 10,
        },
        FontSet::empty(),
    );
    assert!(matches!(zero, Err(GenError::SurfaceUnavailable(_))));

    let huge = DrawingSurface::acquire(
        Canvas {
            width: 70_000,
            height: 10,
        },
        FontSet::empty(),
    );
    assert!(matches!(huge, Err(GenError::SurfaceUnavailable(_))));
}

#[test]
fn solid_rect_covers_surface() {
    let mut s = small();
    s.begin_frame();
    s.fill_rect(
        Rect::new(0.0, 0.0, 64.0, 36.0),
        Affine::IDENTITY,
        Rgba8::rgb(255, 0, 0),
    );
    s.end_frame();
    assert_eq!(px(&s, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&s, 63, 35), [255, 0, 0, 255]);

    let frame = s.snapshot();
    assert_eq!(frame.data.len(), 64 * 36 * 4);
    assert!(frame.premultiplied);
}

#[test]
fn frames_do_not_accumulate() {
    let mut s = small();
    s.begin_frame();
    s.fill_rect(
        Rect::new(0.0, 0.0, 8.0, 8.0),
        Affine::IDENTITY,
        Rgba8::rgb(0, 0, 255),
    );
    s.end_frame();
    assert_eq!(px(&s, 2, 2), [0, 0, 255, 255]);

    s.begin_frame();
    s.end_frame();
    assert_eq!(px(&s, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn diagonal_gradient_runs_corner_to_corner() {
    let mut s = small();
    let start = Rgba8::rgb(0, 0, 0);
    let end = Rgba8::rgb(255, 255, 255);
    s.begin_frame();
    s.fill_diagonal_gradient(start, end).unwrap();
    s.end_frame();
    let tl = px(&s, 0, 0);
    let br = px(&s, 63, 35);
    assert!(tl[0] < 16, "top-left {tl:?}");
    assert!(br[0] > 239, "bottom-right {br:?}");
    assert_eq!(tl[3], 255);
}

#[test]
fn gradient_image_matches_canvas() {
    let canvas = Canvas {
        width: 4,
        height: 2,
    };
    assert!(diagonal_gradient_image(canvas, Rgba8::rgb(1, 2, 3), Rgba8::rgb(4, 5, 6)).is_ok());
    assert!(pixmap_from_premul_bytes(&[0; 12], 2, 2).is_err());
}

/// Bounding box of pixels matching `ink`, as `(x0, y0, x1, y1)` inclusive.
fn ink_bbox(s: &DrawingSurface, ink: impl Fn([u8; 4]) -> bool) -> Option<(usize, usize, usize, usize)> {
    let c = s.canvas();
    let mut bbox: Option<(usize, usize, usize, usize)> = None;
    for y in 0..c.height as usize {
        for x in 0..c.width as usize {
            if !ink(px(s, x, y)) {
                continue;
            }
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bbox
}

#[test]
fn glyph_color_follows_the_run() {
    let (a, b) = (Rgba8::rgb(0, 0, 0), Rgba8::rgb(200, 100, 0));
    assert_eq!(glyph_color(TextPaint::Solid(b), 10.0, 100.0), b);
    assert_eq!(glyph_color(TextPaint::Horizontal(a, b), 0.0, 100.0), a);
    assert_eq!(glyph_color(TextPaint::Horizontal(a, b), 100.0, 100.0), b);
    assert_eq!(
        glyph_color(TextPaint::Horizontal(a, b), 50.0, 100.0),
        Rgba8::rgb(100, 50, 0)
    );
}

#[test]
fn text_lands_inside_its_layout_box() {
    let fonts = FontSet::discover(None, None).unwrap();
    if !fonts.has_text_font() {
        return;
    }
    let mut s = DrawingSurface::acquire(
        Canvas {
            width: 480,
            height: 300,
        },
        fonts,
    )
    .unwrap();
    let layout = s
        .layout_text(FontRole::Text, "Modo dev: on", 40)
        .unwrap()
        .unwrap();
    let (w, h) = (layout.width(), layout.height());

    s.begin_frame();
    s.fill_text(
        &layout,
        Point::new(100.0, 200.0),
        TextPaint::Solid(Rgba8::rgb(255, 255, 255)),
    );
    s.end_frame();

    let (x0, y0, x1, y1) = ink_bbox(&s, |p| p[3] > 0).expect("text drew nothing");
    assert!(x0 as f64 >= 98.0 && (x1 as f64) <= 100.0 + w + 2.0, "x {x0}..{x1}, width {w}");
    assert!(y0 as f64 >= 199.0 && (y1 as f64) <= 200.0 + h + 1.0, "y {y0}..{y1}, height {h}");
    assert!((x1 - x0) as f64 >= 0.8 * w, "ink spans {} of {w}", x1 - x0);
    assert!((y1 - y0) as f64 >= 0.4 * h, "ink height {} of {h}", y1 - y0);
}

#[test]
fn horizontal_paint_colors_left_and_right_glyphs_apart() {
    let fonts = FontSet::discover(None, None).unwrap();
    if !fonts.has_text_font() {
        return;
    }
    let mut s = DrawingSurface::acquire(
        Canvas {
            width: 480,
            height: 120,
        },
        fonts,
    )
    .unwrap();
    let layout = s
        .layout_text(FontRole::Text, "Modo dev: on", 40)
        .unwrap()
        .unwrap();

    s.begin_frame();
    s.fill_text(
        &layout,
        Point::new(20.0, 20.0),
        TextPaint::Horizontal(Rgba8::rgb(255, 0, 0), Rgba8::rgb(0, 0, 255)),
    );
    s.end_frame();

    let (x0, _, x1, _) = ink_bbox(&s, |p| p[3] == 255).expect("no solid ink");
    let third = (x1 - x0) / 3;
    let left = ink_bbox(&s, |p| p[3] == 255 && p[0] > p[2]).expect("no red ink");
    let right = ink_bbox(&s, |p| p[3] == 255 && p[2] > p[0]).expect("no blue ink");
    assert!(left.0 <= x0 + third, "red starts at {} (ink {x0}..{x1})", left.0);
    assert!(right.2 >= x1 - third, "blue ends at {} (ink {x0}..{x1})", right.2);
    assert!(left.0 < right.0);
}

#[test]
fn straight_alpha_undoes_premultiplication() {
    let frame = FrameRGBA {
        width: 3,
        height: 1,
        data: vec![
            255, 0, 0, 255, // opaque
            64, 32, 0, 128, // half coverage
            9, 9, 9, 0, // transparent
        ],
        premultiplied: true,
    };
    let straight = frame.into_straight_alpha();
    assert!(!straight.premultiplied);
    assert_eq!(
        straight.data,
        vec![255, 0, 0, 255, 128, 64, 0, 128, 0, 0, 0, 0]
    );
    assert_eq!(straight.clone().into_straight_alpha(), straight);
}

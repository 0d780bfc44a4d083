use super::*;
use crate::render::text::FontSet;

fn small_canvas() -> Canvas {
    Canvas {
        width: 192,
        height: 108,
    }
}

#[test]
fn face_index_starts_at_zero_and_stays_in_range() {
    assert_eq!(face_index(0.0), 0);
    assert_eq!(face_index(0.49), 0);
    assert_eq!(face_index(0.5), 1);
    assert_eq!(face_index(3.5), 0);
    for k in 0..10_000 {
        assert!(face_index(k as f64 * 0.037) < FACES.len());
    }
    assert_eq!(face_index(-1.0), 0);
    assert_eq!(face_index(f64::NAN), 0);
    assert!(face_index(f64::MAX) < FACES.len());
}

#[test]
fn caption_index_cycles_through_every_caption() {
    let mut seen = [false; CAPTIONS.len()];
    let mut t = 0.0;
    while t < 1.6 * CAPTIONS.len() as f64 * 3.0 {
        seen[caption_index(t)] = true;
        t += 0.1;
    }
    assert!(seen.iter().all(|s| *s));
    assert_eq!(caption_index(0.0), 0);
    assert_eq!(caption_index(1.7), 1);
    assert_eq!(caption_index(8.0), 0);
    assert!(caption_index(1e300) < CAPTIONS.len());
    assert_eq!(caption_index(f64::INFINITY), 0);
}

#[test]
fn background_stops_per_theme() {
    let (a, b) = background_stops(Theme::Escuro, 12.3);
    assert_eq!(a, Rgba8::rgb(0x11, 0x18, 0x27));
    assert_eq!(b, Rgba8::rgb(0x1f, 0x29, 0x37));

    let (a0, _) = background_stops(Theme::Colorido, 0.0);
    let (a1, _) = background_stops(Theme::Colorido, 3.0);
    assert_ne!(a0, a1);
    // Hue advances 40°/s, so after 9 s it has wrapped all the way around.
    assert_eq!(background_stops(Theme::Colorido, 9.0), background_stops(Theme::Colorido, 0.0));
    assert_eq!(background_stops(Theme::Pastel, 18.0), background_stops(Theme::Pastel, 0.0));
}

#[test]
fn confetti_is_deterministic_and_wraps() {
    let c = Canvas::HD;
    for i in 0..CONFETTI_COUNT {
        for k in 0..50 {
            let t = k as f64 * 0.73;
            let s = confetti_sprite(i, t, c);
            assert_eq!(s, confetti_sprite(i, t, c));
            assert!(s.center.x >= -30.0 && s.center.x < c.w() + 30.0);
            assert!(s.center.y >= -30.0 && s.center.y < c.h() + 30.0);
        }
    }
    let s = confetti_sprite(1, 0.0, c);
    assert_eq!(s.center, Point::new(97.0 - 30.0, 53.0 - 30.0));
    assert!((s.angle_rad - 17f64.to_radians()).abs() < 1e-12);
}

#[test]
fn face_pose_oscillates_around_center() {
    let p = face_pose(0.0, Canvas::HD);
    assert_eq!(p.center, Point::new(480.0, 270.0 + 120.0));
    assert_eq!(p.radius, 80.0);
    for k in 0..500 {
        let p = face_pose(k as f64 * 0.05, Canvas::HD);
        assert!(p.radius >= 74.0 && p.radius <= 86.0);
        assert!((p.center.x - 480.0).abs() <= 220.0 + 1e-9);
    }
}

#[test]
fn wiggle_outline_is_closed_ring() {
    let pose = FacePose {
        center: Point::new(100.0, 100.0),
        radius: 80.0,
    };
    let path = wiggle_outline(pose, 1.25);
    let els = path.elements();
    assert_eq!(els.len(), 72 + 1);
    assert!(matches!(els.last(), Some(kurbo::PathEl::ClosePath)));
    for el in els {
        if let kurbo::PathEl::LineTo(p) | kurbo::PathEl::MoveTo(p) = el {
            let d = p.distance(pose.center);
            assert!((74.0 - 1e-9..=86.0 + 1e-9).contains(&d));
        }
    }
}

#[test]
fn caption_box_pads_text() {
    let anchor = caption_anchor(0.0, Canvas::HD);
    assert_eq!(anchor, Point::new(480.0, 460.0));
    let r = caption_box(anchor, 100.0);
    assert_eq!(r.width(), 132.0);
    assert_eq!(r.height(), 56.0);
    assert_eq!(r.center(), anchor);
}

#[test]
fn palette_swaps_for_dark_theme() {
    assert_eq!(Palette::for_theme(Theme::Escuro).face, Rgba8::rgb(0xff, 0xd1, 0x66));
    assert_eq!(Palette::for_theme(Theme::Pastel), Palette::for_theme(Theme::Colorido));
}

#[test]
fn draw_is_repeatable_for_same_t() {
    let mut surface = DrawingSurface::acquire(small_canvas(), FontSet::empty()).unwrap();
    let scene = Scene::new(Theme::Colorido);

    scene.draw(&mut surface, 2.5).unwrap();
    let a = surface.snapshot();
    scene.draw(&mut surface, 2.5).unwrap();
    let b = surface.snapshot();
    assert_eq!(a, b);

    // The background is opaque everywhere.
    assert!(a.data.chunks_exact(4).all(|px| px[3] == 255));

    scene.draw(&mut surface, 2.6).unwrap();
    assert_ne!(surface.snapshot(), a);
}

#[test]
fn themes_draw_differently() {
    let mut surface = DrawingSurface::acquire(small_canvas(), FontSet::empty()).unwrap();
    Scene::new(Theme::Colorido).draw(&mut surface, 1.0).unwrap();
    let bright = surface.snapshot();
    Scene::new(Theme::Escuro).draw(&mut surface, 1.0).unwrap();
    let dark = surface.snapshot();
    assert_ne!(bright, dark);
}

#[test]
fn caption_ink_stays_inside_its_box() {
    let fonts = FontSet::discover(None, None).unwrap();
    if !fonts.has_text_font() {
        return;
    }
    let mut surface = DrawingSurface::acquire(Canvas::HD, fonts).unwrap();
    let t = 1.7;
    let text = CAPTIONS[caption_index(t)];
    let layout = surface
        .layout_text(FontRole::Text, text, CAPTION_FONT_PX)
        .unwrap()
        .unwrap();
    let rect = caption_box(caption_anchor(t, Canvas::HD), layout.width());

    surface.begin_frame();
    Scene::new(Theme::Colorido).draw_caption(&mut surface, t).unwrap();
    surface.end_frame();

    // Text gradient runs #ef4444 to #f59e0b; the fill is white and the border #fbbf24.
    let frame = surface.snapshot();
    let width = frame.width as usize;
    let (mut x0, mut x1) = (usize::MAX, 0);
    for (i, p) in frame.data.chunks_exact(4).enumerate() {
        if p[3] == 255 && p[0] > 200 && p[1] < 170 && p[2] < 128 {
            let (x, y) = ((i % width) as f64, (i / width) as f64);
            assert!(
                rect.inset(1.0).contains(Point::new(x, y)),
                "caption ink at ({x}, {y}) outside {rect:?}"
            );
            x0 = x0.min(i % width);
            x1 = x1.max(i % width);
        }
    }
    assert!(x1 > x0, "caption drew no ink");
    assert!(
        (x1 - x0) as f64 >= 0.8 * layout.width(),
        "ink spans {} of {}",
        x1 - x0,
        layout.width()
    );
}

use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0).is_err());
    assert_eq!(Fps::new(24).unwrap().get(), 24);
}

#[test]
fn fps_ceil_absorbs_float_noise() {
    let fps = Fps::new(60).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(3.0), 180);
    assert_eq!(fps.secs_to_frames_ceil(0.1 + 0.2), 18);
    assert_eq!(fps.secs_to_frames_ceil(3.001), 181);
}

#[test]
fn canvas_default_is_hd() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (960, 540));
    assert_eq!(c.rgba_len(), 960 * 540 * 4);
}

#[test]
fn lerp_clamps_to_endpoints() {
    let a = Rgba8::rgb(0x11, 0x18, 0x27);
    let b = Rgba8::rgb(0x1f, 0x29, 0x37);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, -3.0), a);
    assert_eq!(a.lerp(b, 7.0), b);
}

#[test]
fn premul_scales_by_alpha() {
    let c = Rgba8::rgb(0, 0, 0).with_alpha(0.15);
    assert_eq!(c.a, 38);
    assert_eq!(Rgba8::rgb(255, 255, 255).to_premul_bytes(), [255, 255, 255, 255]);
    assert_eq!(
        Rgba8::rgb(200, 100, 50).with_alpha(0.0).to_premul_bytes(),
        [0, 0, 0, 0]
    );
}

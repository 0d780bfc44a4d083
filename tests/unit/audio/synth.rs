use super::*;

const SR: u32 = 48_000;

fn rendered(sound: Sound, len_secs: f64) -> Vec<f32> {
    let mut out = vec![0.0f32; (len_secs * f64::from(SR)) as usize];
    render_sound(&sound, 0, SR, &mut out);
    out
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

#[test]
fn exponential_ramp_hits_endpoints() {
    let r = Ramp::Exponential {
        from: 140.0,
        to: 40.0,
        ramp_secs: 0.2,
    };
    assert_eq!(r.value_at(0.0), 140.0);
    assert_eq!(r.value_at(0.5), 40.0);
    let mid = r.value_at(0.1);
    assert!((mid - (140.0f64 * 40.0).sqrt()).abs() < 1e-9);
}

#[test]
fn linear_ramp_reaches_zero() {
    let r = Ramp::Linear {
        from: 0.12,
        to: 0.0,
        ramp_secs: 0.8,
    };
    assert!((r.value_at(0.4) - 0.06).abs() < 1e-12);
    assert_eq!(r.value_at(0.8), 0.0);
}

#[test]
fn kick_is_loud_then_silent() {
    let out = rendered(Sound::Kick, 0.5);
    let head = &out[..(0.05 * f64::from(SR)) as usize];
    assert!(peak(head) > 0.5);
    let tail = &out[(0.27 * f64::from(SR)) as usize..];
    assert_eq!(peak(tail), 0.0);
}

#[test]
fn chord_stays_under_three_voice_gain() {
    let out = rendered(Sound::Chord { base_hz: 330.0 }, 1.0);
    assert!(peak(&out) <= 0.36 + 1e-6);
    assert!(peak(&out) > 0.1);
    let tail = &out[(0.83 * f64::from(SR)) as usize..];
    assert_eq!(peak(tail), 0.0);
}

#[test]
fn snare_is_deterministic_per_start() {
    let mut a = vec![0.0f32; SR as usize];
    let mut b = vec![0.0f32; SR as usize];
    render_sound(&Sound::Snare, 100, SR, &mut a);
    render_sound(&Sound::Snare, 100, SR, &mut b);
    assert_eq!(a, b);
    assert!(peak(&a) > 0.1);
}

#[test]
fn voices_clip_at_buffer_end() {
    let mut out = vec![0.0f32; 100];
    render_sound(&Sound::Boing, 50, SR, &mut out);
    assert!(out[..50].iter().all(|s| *s == 0.0));
    assert!(peak(&out[50..]) > 0.0);
}

#[test]
fn highpass_blocks_dc() {
    let mut f = Biquad::highpass(SR, 800.0, 1.0);
    let mut last = 1.0;
    for _ in 0..SR {
        last = f.process(1.0);
    }
    assert!(last.abs() < 1e-6);
}

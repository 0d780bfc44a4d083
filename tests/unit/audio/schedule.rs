use super::*;

fn count(events: &[ScheduledAudioEvent], kind: SoundKind) -> usize {
    events.iter().filter(|e| e.sound.kind() == kind).count()
}

#[test]
fn eight_second_clip_has_eight_bars() {
    let events = schedule_backing_track(8.0, LEAD_IN_SECS);
    assert_eq!(count(&events, SoundKind::Kick), 8);
    assert_eq!(count(&events, SoundKind::Snare), 8);
    assert_eq!(count(&events, SoundKind::Boing), 4);
    assert_eq!(count(&events, SoundKind::Chord), 4);
}

#[test]
fn fractional_duration_rounds_bars_up() {
    let events = schedule_backing_track(3.2, 0.0);
    assert_eq!(count(&events, SoundKind::Kick), 4);
    assert_eq!(count(&events, SoundKind::Chord), 2);
}

#[test]
fn offsets_follow_bar_grid() {
    let origin = 0.2;
    let events = schedule_backing_track(3.0, origin);

    let kicks: Vec<f64> = events
        .iter()
        .filter(|e| e.sound.kind() == SoundKind::Kick)
        .map(|e| e.start_secs)
        .collect();
    for (bar, at) in kicks.iter().enumerate() {
        assert!((at - (origin + bar as f64 * BAR_SECS)).abs() < 1e-12);
    }

    let snare = events
        .iter()
        .find(|e| e.sound.kind() == SoundKind::Snare)
        .unwrap();
    assert!((snare.start_secs - (origin + 0.25)).abs() < 1e-12);

    let boing = events
        .iter()
        .find(|e| e.sound.kind() == SoundKind::Boing)
        .unwrap();
    assert!((boing.start_secs - (origin + 0.12)).abs() < 1e-12);
}

#[test]
fn chords_only_on_even_bars() {
    let events = schedule_backing_track(5.0, 0.0);
    for e in events.iter().filter(|e| e.sound.kind() == SoundKind::Chord) {
        let bar = (e.start_secs / BAR_SECS).round() as u32;
        assert_eq!(bar % 2, 0);
        assert_eq!(e.sound, Sound::Chord { base_hz: 330.0 });
    }
}

#[test]
fn degenerate_durations_schedule_nothing() {
    assert!(schedule_backing_track(0.0, 0.0).is_empty());
    assert!(schedule_backing_track(f64::NAN, 0.0).is_empty());
}

use video_engracado::{
    ArtifactRegistry, Canvas, FontSet, GenError, GeneratorConfig, InMemoryEncoder, RunOptions,
    StaticCapabilities, Studio, StudioState, Theme, VirtualClock, run_generation,
};

fn small_options() -> RunOptions {
    RunOptions {
        canvas: Canvas {
            width: 64,
            height: 36,
        },
        fonts: FontSet::empty(),
    }
}

fn config(duration_secs: f64, fps: u32) -> GeneratorConfig {
    GeneratorConfig {
        duration_secs,
        fps,
        theme: Theme::Colorido,
    }
}

fn webm_studio() -> Studio {
    Studio::new(
        Box::new(StaticCapabilities::new(["video/webm"])),
        small_options(),
    )
}

fn frame_numbers(bytes: &[u8]) -> Vec<u64> {
    assert_eq!(bytes.len() % 8, 0);
    bytes
        .chunks_exact(8)
        .map(|c| {
            let mut le = [0u8; 8];
            le.copy_from_slice(c);
            u64::from_le_bytes(le)
        })
        .collect()
}

#[test]
fn successful_run_publishes_one_artifact() {
    let mut studio = webm_studio();
    let mut clock = VirtualClock::with_rate(60);
    studio
        .generate(&config(3.0, 24), &mut clock, |_| Ok(InMemoryEncoder::new()))
        .unwrap();

    assert!(studio.trigger_enabled());
    assert!(studio.error_text().is_none());
    assert_eq!(studio.live_artifacts(), 1);

    let artifact = studio.artifact().expect("artifact");
    assert_eq!(artifact.mime_type().as_str(), "video/webm");
    assert_eq!(artifact.file_name(), "video-engracado.webm");

    let report = &studio.published().expect("published").report;
    assert_eq!(report.frames, 72);
    assert_eq!(report.bytes, artifact.len());
    assert_eq!(report.audio_events, 3 * 2 + 2 * 2);
}

#[test]
fn unsupported_host_shows_error_and_never_builds_an_encoder() {
    let mut studio = Studio::new(Box::new(StaticCapabilities::none()), small_options());
    let mut clock = VirtualClock::with_rate(60);
    let mut factory_called = false;
    studio
        .generate(&config(3.0, 24), &mut clock, |_| {
            factory_called = true;
            Ok(InMemoryEncoder::new())
        })
        .unwrap();

    assert!(!factory_called);
    assert_eq!(
        studio.error_text().as_deref(),
        Some("Seu navegador não suporta gravação de vídeo WebM.")
    );
    assert!(studio.artifact().is_none());
    assert!(studio.trigger_enabled());
    assert_eq!(studio.live_artifacts(), 0);
    // Nothing was drawn: the clock never ticked.
    assert_eq!(clock.ticks(), 0);
}

#[test]
fn loop_stops_at_the_deadline() {
    let mut registry = ArtifactRegistry::new();
    let mut clock = VirtualClock::with_rate(60);
    let published = run_generation(
        &config(3.0, 24),
        &StaticCapabilities::new(["video/webm;codecs=vp8,opus"]),
        &mut clock,
        |_| Ok(InMemoryEncoder::new()),
        &mut registry,
        small_options(),
    )
    .unwrap();

    let report = published.report;
    assert!(report.elapsed_ms >= 3000.0);
    assert!(report.elapsed_ms <= 3000.0 + 1000.0 / 24.0);
    assert!((report.video_secs(24) - 3.0).abs() <= 1.0 / 24.0);
    assert_eq!(report.mime_type.as_str(), "video/webm;codecs=vp8,opus");
    assert_eq!(registry.live_count(), 1);
}

#[test]
fn chunks_keep_order_and_drop_empties() {
    let mut registry = ArtifactRegistry::new();
    let mut clock = VirtualClock::with_rate(60);
    let published = run_generation(
        &config(3.0, 30),
        &StaticCapabilities::new(["video/webm"]),
        &mut clock,
        |_| Ok(InMemoryEncoder::new().with_empty_chunks()),
        &mut registry,
        small_options(),
    )
    .unwrap();

    let numbers = frame_numbers(published.artifact.bytes());
    assert_eq!(numbers, (0..90).collect::<Vec<u64>>());
    assert_eq!(published.report.chunks, 90);
}

#[test]
fn slow_clock_still_yields_the_full_frame_count() {
    // Ticks at 10 Hz: every tick contributes several repeated frames.
    let mut registry = ArtifactRegistry::new();
    let mut clock = VirtualClock::with_rate(10);
    let published = run_generation(
        &config(3.0, 60),
        &StaticCapabilities::new(["video/webm"]),
        &mut clock,
        |_| Ok(InMemoryEncoder::new()),
        &mut registry,
        small_options(),
    )
    .unwrap();

    assert_eq!(published.report.frames, 180);
    assert!(published.report.ticks <= 32);
}

#[test]
fn regenerating_releases_the_previous_reference() {
    let mut studio = webm_studio();
    let mut clock = VirtualClock::with_rate(60);
    studio
        .generate(&config(3.0, 24), &mut clock, |_| Ok(InMemoryEncoder::new()))
        .unwrap();
    let first = studio.published().expect("first").url.clone();

    let mut clock = VirtualClock::with_rate(60);
    studio
        .generate(&config(3.0, 24), &mut clock, |_| Ok(InMemoryEncoder::new()))
        .unwrap();
    let second = studio.published().expect("second").url.clone();

    assert_ne!(first, second);
    assert_eq!(studio.live_artifacts(), 1);
}

#[test]
fn out_of_range_settings_are_clamped() {
    let mut registry = ArtifactRegistry::new();
    let mut clock = VirtualClock::with_rate(60);
    let published = run_generation(
        &config(1.0, 500),
        &StaticCapabilities::new(["video/webm"]),
        &mut clock,
        |_| Ok(InMemoryEncoder::new()),
        &mut registry,
        small_options(),
    )
    .unwrap();

    // 3 s at 60 fps.
    assert_eq!(published.report.frames, 180);
}

#[test]
fn unusable_surface_fails_before_the_encoder() {
    let mut studio = Studio::new(
        Box::new(StaticCapabilities::new(["video/webm"])),
        RunOptions {
            canvas: Canvas {
                width: 0,
                height: 0,
            },
            fonts: FontSet::empty(),
        },
    );
    let mut clock = VirtualClock::with_rate(60);
    let mut factory_called = false;
    studio
        .generate(&config(3.0, 24), &mut clock, |_| {
            factory_called = true;
            Ok(InMemoryEncoder::new())
        })
        .unwrap();

    assert!(!factory_called);
    assert!(matches!(
        studio.state(),
        StudioState::Failed(GenError::SurfaceUnavailable(_))
    ));
    assert_eq!(studio.error_text().as_deref(), Some("Canvas não disponível."));
}

#[test]
fn encoder_failure_is_reported_with_prefix() {
    let mut studio = webm_studio();
    let mut clock = VirtualClock::with_rate(60);
    studio
        .generate(&config(3.0, 24), &mut clock, |_| {
            Err::<InMemoryEncoder, _>(GenError::encode("boom"))
        })
        .unwrap();

    let text = studio.error_text().expect("error text");
    assert!(text.starts_with("Falha ao gerar o vídeo: "));
    assert!(text.contains("boom"));
    assert!(studio.artifact().is_none());
}

//! One generation run: probe, synthesize, draw, record, publish.
//!
//! The run is a single linear function. It suspends only in [`FrameClock::next_frame`], in the
//! encoder's chunk polling and in the encoder's final `stop`, so the whole pipeline can be driven
//! by a virtual clock and an in-memory encoder.

use crate::artifact::{Artifact, ArtifactRegistry, ArtifactUrl};
use crate::audio::context::AudioContext;
use crate::audio::schedule::schedule_backing_track;
use crate::clock::{FrameClock, FrameLoop};
use crate::config::GeneratorConfig;
use crate::encode::encoder::MediaEncoder;
use crate::encode::recorder::Recorder;
use crate::foundation::core::Canvas;
use crate::foundation::error::{GenError, GenResult};
use crate::probe::{CapabilityQuery, MimeType, PREFERRED_MIME, negotiate_mime_type};
use crate::render::scene::Scene;
use crate::render::surface::DrawingSurface;
use crate::render::text::FontSet;
use crate::stream::{CaptureSampler, CombinedStream, TrackId, VideoTrack};
use std::sync::Arc;
use std::time::Duration;

const VIDEO_TRACK: TrackId = TrackId(1);
const AUDIO_TRACK: TrackId = TrackId(2);

/// Resources a run draws with.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Drawing surface size.
    pub canvas: Canvas,
    /// Fonts for the face glyphs and captions.
    pub fonts: FontSet,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas::HD,
            fonts: FontSet::empty(),
        }
    }
}

/// What a finished run did.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Negotiated recording type.
    pub mime_type: MimeType,
    /// Animation ticks drawn.
    pub ticks: u64,
    /// Frames sampled into the video track.
    pub frames: u64,
    /// Audio events scheduled.
    pub audio_events: usize,
    /// Elapsed animation time when the loop stopped, in milliseconds.
    pub elapsed_ms: f64,
    /// Chunks kept by the recorder.
    pub chunks: usize,
    /// Artifact size.
    pub bytes: usize,
}

impl RunReport {
    /// Nominal length of the video track.
    pub fn video_secs(&self, fps: u32) -> f64 {
        self.frames as f64 / f64::from(fps.max(1))
    }
}

/// A published artifact together with the reference it resolves through.
#[derive(Clone, Debug)]
pub struct Published {
    /// Live reference into the registry.
    pub url: ArtifactUrl,
    /// The recording.
    pub artifact: Arc<Artifact>,
    /// Run statistics.
    pub report: RunReport,
}

struct LoopStats {
    ticks: u64,
    elapsed_ms: f64,
}

/// Run the whole pipeline once and publish the result in `registry`.
///
/// Nothing is created before the recording type has been negotiated: when no type is supported
/// the run fails with [`GenError::UnsupportedFormat`] and `make_encoder` is never called.
#[tracing::instrument(skip_all, fields(duration = config.duration_secs, fps = config.fps, theme = %config.theme))]
pub fn run_generation<C, E, F>(
    config: &GeneratorConfig,
    caps: &dyn CapabilityQuery,
    clock: &mut C,
    make_encoder: F,
    registry: &mut ArtifactRegistry,
    options: RunOptions,
) -> GenResult<Published>
where
    C: FrameClock + ?Sized,
    E: MediaEncoder,
    F: FnOnce(&MimeType) -> GenResult<E>,
{
    let config = config.clamped();
    let fps = config.frame_rate()?;

    let mime_type =
        negotiate_mime_type(caps, PREFERRED_MIME).ok_or(GenError::UnsupportedFormat)?;
    tracing::info!(mime = %mime_type, "negotiated recording type");

    let mut surface = DrawingSurface::acquire(options.canvas, options.fonts)?;

    let mut audio = AudioContext::new();
    let events = schedule_backing_track(config.duration_secs, audio.track_origin());
    let audio_events = events.len();
    audio.schedule(events);
    let audio_track = audio.render_destination(AUDIO_TRACK, config.duration_secs)?;

    let stream = CombinedStream::compose(
        [VideoTrack {
            id: VIDEO_TRACK,
            canvas: options.canvas,
            fps,
        }],
        [audio_track],
    );

    let mut recorder = Recorder::new(make_encoder(&mime_type)?, mime_type.clone());
    recorder.start(&stream)?;

    let scene = Scene::new(config.theme);
    let mut sampler = CaptureSampler::new(fps, config.duration_secs);
    let mut frame_loop = FrameLoop::new();

    let looped = draw_loop(
        &config,
        clock,
        &scene,
        &mut surface,
        &mut sampler,
        &mut frame_loop,
        &mut recorder,
    );

    // Finalization: runs whether the loop succeeded or not.
    frame_loop.cancel();
    if let Err(e) = audio.suspend() {
        tracing::debug!(error = %e, "audio context suspend failed; ignoring");
    }
    let stats = looped?;

    let artifact = Arc::new(recorder.stop()?);
    let url = registry.create_url(Arc::clone(&artifact));

    let report = RunReport {
        mime_type,
        ticks: stats.ticks,
        frames: sampler.emitted(),
        audio_events,
        elapsed_ms: stats.elapsed_ms,
        chunks: recorder.chunks().len(),
        bytes: artifact.len(),
    };
    tracing::info!(
        url = %url,
        frames = report.frames,
        ticks = report.ticks,
        bytes = report.bytes,
        elapsed_ms = report.elapsed_ms,
        "published artifact"
    );
    Ok(Published {
        url,
        artifact,
        report,
    })
}

#[allow(clippy::too_many_arguments)]
fn draw_loop<C, E>(
    config: &GeneratorConfig,
    clock: &mut C,
    scene: &Scene,
    surface: &mut DrawingSurface,
    sampler: &mut CaptureSampler,
    frame_loop: &mut FrameLoop,
    recorder: &mut Recorder<E>,
) -> GenResult<LoopStats>
where
    C: FrameClock + ?Sized,
    E: MediaEncoder,
{
    let total_ms = config.total_ms();
    let start = clock.now();
    let mut elapsed_ms = 0.0;

    frame_loop.request_frame();
    while frame_loop.take_pending() {
        let now = clock.next_frame();
        let t = now.checked_sub(start).unwrap_or(Duration::ZERO).as_secs_f64();
        elapsed_ms = t * 1000.0;

        scene.draw(surface, t)?;
        let due = sampler.frames_due(t);
        if due > 0 {
            let frame = surface.snapshot();
            for _ in 0..due {
                recorder.record_frame(&frame)?;
            }
        }

        if elapsed_ms >= total_ms {
            tracing::debug!(elapsed_ms, ticks = frame_loop.ticks(), "stop deadline reached");
            break;
        }
        frame_loop.request_frame();
    }

    Ok(LoopStats {
        ticks: frame_loop.ticks(),
        elapsed_ms,
    })
}

//! Procedurally generated funny video clips with a synthesized backing track.
//!
//! One trigger runs a linear pipeline:
//!
//! - Negotiate a recordable WebM type ([`negotiate_mime_type`])
//! - Schedule and render the backing track ([`AudioContext`])
//! - Draw the animated [`Scene`] onto a [`DrawingSurface`] once per clock tick
//! - Record both into a [`MediaEncoder`] and publish the resulting [`Artifact`]
//!
//! [`Studio`] wraps the run with the presenter state (trigger, error area, download).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Finished recordings and their references.
pub mod artifact;
/// Backing-track synthesis.
pub mod audio;
/// Animation clocks and the frame loop.
pub mod clock;
/// Generation settings.
pub mod config;
/// Encoders and the recorder.
pub mod encode;
/// The end-to-end generation run.
pub mod pipeline;
/// Recording-format negotiation.
pub mod probe;
/// Drawing surface and scene.
pub mod render;
/// Combined audio/video stream and frame sampling.
pub mod stream;
/// Presenter state.
pub mod studio;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Fps, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{GenError, GenResult};

pub use crate::artifact::{Artifact, ArtifactRegistry, ArtifactUrl};
pub use crate::audio::context::AudioContext;
pub use crate::clock::{FrameClock, RealtimeClock, VirtualClock};
pub use crate::config::{GeneratorConfig, Theme};
pub use crate::encode::encoder::{InMemoryEncoder, MediaEncoder};
pub use crate::encode::ffmpeg::{FfmpegEncoder, FfmpegEncoderOpts};
pub use crate::encode::recorder::{Recorder, RecorderState};
pub use crate::pipeline::{Published, RunOptions, RunReport, run_generation};
pub use crate::probe::{
    CapabilityQuery, FfmpegCapabilities, MimeType, StaticCapabilities, negotiate_mime_type,
};
pub use crate::render::render_still;
pub use crate::render::scene::Scene;
pub use crate::render::surface::{DrawingSurface, FrameRGBA};
pub use crate::render::text::FontSet;
pub use crate::studio::{Studio, StudioState};

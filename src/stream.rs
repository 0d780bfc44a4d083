//! Combined media stream: one video track sampled from the drawing surface plus one audio track
//! from the synthesizer destination.

use crate::foundation::core::{Canvas, Fps};
use std::sync::Arc;

/// Track identity inside a [`CombinedStream`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub u32);

/// Live pixel source of the drawing surface, sampled at `fps`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoTrack {
    /// Track identity.
    pub id: TrackId,
    /// Surface size.
    pub canvas: Canvas,
    /// Sampling rate of the stream.
    pub fps: Fps,
}

/// Interleaved `f32` PCM produced by the audio destination.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    /// Track identity.
    pub id: TrackId,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved samples.
    pub samples: Arc<Vec<f32>>,
}

impl AudioTrack {
    /// Track length in seconds.
    pub fn duration_secs(&self) -> f64 {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        frames as f64 / f64::from(self.sample_rate.max(1))
    }
}

/// A track of either kind.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaTrack {
    /// Video.
    Video(VideoTrack),
    /// Audio.
    Audio(AudioTrack),
}

impl MediaTrack {
    /// Identity of the wrapped track.
    pub fn id(&self) -> TrackId {
        match self {
            MediaTrack::Video(v) => v.id,
            MediaTrack::Audio(a) => a.id,
        }
    }
}

/// Grouping of video and audio tracks handed to the recorder as one unit.
///
/// Tracks keep their identities; nothing is mixed or transformed here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombinedStream {
    tracks: Vec<MediaTrack>,
}

impl CombinedStream {
    /// Empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track.
    pub fn add_track(&mut self, track: MediaTrack) {
        self.tracks.push(track);
    }

    /// Merge the surface's video tracks with the destination's audio tracks.
    pub fn compose(
        video: impl IntoIterator<Item = VideoTrack>,
        audio: impl IntoIterator<Item = AudioTrack>,
    ) -> Self {
        let mut stream = Self::new();
        video
            .into_iter()
            .for_each(|t| stream.add_track(MediaTrack::Video(t)));
        audio
            .into_iter()
            .for_each(|t| stream.add_track(MediaTrack::Audio(t)));
        stream
    }

    /// All tracks in insertion order.
    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    /// Video tracks.
    pub fn video_tracks(&self) -> impl Iterator<Item = &VideoTrack> {
        self.tracks.iter().filter_map(|t| match t {
            MediaTrack::Video(v) => Some(v),
            MediaTrack::Audio(_) => None,
        })
    }

    /// Audio tracks.
    pub fn audio_tracks(&self) -> impl Iterator<Item = &AudioTrack> {
        self.tracks.iter().filter_map(|t| match t {
            MediaTrack::Audio(a) => Some(a),
            MediaTrack::Video(_) => None,
        })
    }
}

/// Decides how many output frames each animation tick contributes to the video track.
///
/// Output frame `k` is due at `k / fps` seconds and only frames strictly before the stop deadline
/// exist. Ticks slower than `fps` repeat the current surface; faster ticks contribute nothing.
#[derive(Clone, Copy, Debug)]
pub struct CaptureSampler {
    fps: Fps,
    total_frames: u64,
    next: u64,
}

impl CaptureSampler {
    /// Sampler for a stream of `duration_secs`.
    pub fn new(fps: Fps, duration_secs: f64) -> Self {
        Self {
            fps,
            total_frames: fps.secs_to_frames_ceil(duration_secs.max(0.0)),
            next: 0,
        }
    }

    /// Number of frames to emit for a tick at `elapsed_secs`.
    pub fn frames_due(&mut self, elapsed_secs: f64) -> u64 {
        let elapsed = if elapsed_secs.is_finite() {
            elapsed_secs.max(0.0)
        } else {
            0.0
        };
        let reached = (elapsed * self.fps.as_f64() + 1e-9).floor() as u64;
        let upto = reached.saturating_add(1).min(self.total_frames);
        let due = upto.saturating_sub(self.next);
        self.next = self.next.max(upto);
        due
    }

    /// Frames emitted so far.
    pub fn emitted(&self) -> u64 {
        self.next
    }

    /// Frames the finished stream will contain.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

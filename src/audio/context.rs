use crate::audio::schedule::{LEAD_IN_SECS, ScheduledAudioEvent};
use crate::audio::synth::render_sound;
use crate::foundation::error::{GenError, GenResult};
use crate::stream::{AudioTrack, TrackId};
use std::path::Path;
use std::sync::Arc;

/// Sample rate of the synthesized track.
pub const SAMPLE_RATE: u32 = 48_000;
/// Channel count of the synthesized track.
pub const CHANNELS: u16 = 2;
/// Attenuation of the shared gain stage every voice passes through.
pub const MASTER_GAIN: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Lifecycle of an [`AudioContext`].
pub enum AudioState {
    /// Accepting events and rendering.
    Running,
    /// Suspended during finalization.
    Suspended,
}

/// Offline audio engine: events are scheduled up front and rendered into one PCM track.
///
/// Timing of scheduled events is owned by the context clock; the visual loop only shares the
/// origin.
#[derive(Debug)]
pub struct AudioContext {
    sample_rate: u32,
    channels: u16,
    master_gain: f32,
    current_time: f64,
    state: AudioState,
    events: Vec<ScheduledAudioEvent>,
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioContext {
    /// Create a running context at 48 kHz stereo.
    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
            master_gain: MASTER_GAIN,
            current_time: 0.0,
            state: AudioState::Running,
            events: Vec::new(),
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Audio clock in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Clock origin for the backing track: now plus a short lead-in.
    pub fn track_origin(&self) -> f64 {
        self.current_time + LEAD_IN_SECS
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AudioState {
        self.state
    }

    /// Events scheduled so far, in scheduling order.
    pub fn events(&self) -> &[ScheduledAudioEvent] {
        &self.events
    }

    /// Queue events. They are fire-and-forget: nothing about them can be changed later.
    pub fn schedule(&mut self, events: impl IntoIterator<Item = ScheduledAudioEvent>) {
        self.events.extend(events);
    }

    /// Render every scheduled event through the master gain into a track of `duration_secs`.
    ///
    /// Voices that ring past the end are cut; the output is clamped to `[-1, 1]`.
    #[tracing::instrument(skip(self), fields(events = self.events.len()))]
    pub fn render_destination(&self, id: TrackId, duration_secs: f64) -> GenResult<AudioTrack> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(GenError::validation("audio duration must be finite and > 0"));
        }
        let frames = (duration_secs * f64::from(self.sample_rate)).round() as usize;
        let mut mono = vec![0.0f32; frames];

        for event in &self.events {
            let start_secs = event.start_secs - self.current_time;
            if start_secs < 0.0 || start_secs >= duration_secs {
                continue;
            }
            let start = (start_secs * f64::from(self.sample_rate)).round() as usize;
            render_sound(&event.sound, start, self.sample_rate, &mut mono);
        }

        let channels = usize::from(self.channels);
        let mut interleaved = vec![0.0f32; frames * channels];
        for (dst, &s) in interleaved.chunks_exact_mut(channels).zip(&mono) {
            dst.fill((s * self.master_gain).clamp(-1.0, 1.0));
        }

        Ok(AudioTrack {
            id,
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: Arc::new(interleaved),
        })
    }

    /// Suspend the engine. Fails when it is not running.
    pub fn suspend(&mut self) -> GenResult<()> {
        match self.state {
            AudioState::Running => {
                self.state = AudioState::Suspended;
                Ok(())
            }
            AudioState::Suspended => Err(GenError::validation("audio context is not running")),
        }
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> GenResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            GenError::encode(format!(
                "failed to create audio scratch directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        GenError::encode(format!(
            "failed to write audio scratch file '{}': {e}",
            out_path.display()
        ))
    })
}

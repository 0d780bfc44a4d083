/// Silence before the first event, so the stream does not open on a click.
pub const LEAD_IN_SECS: f64 = 0.2;
/// Length of one bar of the backing track.
pub const BAR_SECS: f64 = 0.5;
/// Snare offset inside a bar.
pub const SNARE_OFFSET_SECS: f64 = 0.25;
/// Boing offset inside an even bar.
pub const BOING_OFFSET_SECS: f64 = 0.12;
/// Root of the chord stabs.
pub const CHORD_BASE_HZ: f64 = 330.0;

/// Discriminant of [`Sound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Pitched-down sine thump.
    Kick,
    /// High-passed noise burst.
    Snare,
    /// Rising triangle sweep.
    Boing,
    /// Major triad of square waves.
    Chord,
}

/// A sound with its parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sound {
    /// See [`SoundKind::Kick`].
    Kick,
    /// See [`SoundKind::Snare`].
    Snare,
    /// See [`SoundKind::Boing`].
    Boing,
    /// Root, major third and fifth over `base_hz`.
    Chord {
        /// Root frequency.
        base_hz: f64,
    },
}

impl Sound {
    /// Payload-free kind.
    pub fn kind(&self) -> SoundKind {
        match self {
            Sound::Kick => SoundKind::Kick,
            Sound::Snare => SoundKind::Snare,
            Sound::Boing => SoundKind::Boing,
            Sound::Chord { .. } => SoundKind::Chord,
        }
    }
}

/// One sound placed on the audio clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledAudioEvent {
    /// What to play.
    pub sound: Sound,
    /// Start time on the audio clock, in seconds.
    pub start_secs: f64,
}

/// Build the whole backing track for a clip of `duration_secs`, starting at `origin_secs`.
///
/// Bars are half a second long and there are `ceil(duration_secs)` of them. Every bar has a kick
/// on the downbeat and a snare on the offbeat; even bars add a boing and a chord.
pub fn schedule_backing_track(duration_secs: f64, origin_secs: f64) -> Vec<ScheduledAudioEvent> {
    let bars = if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs.ceil() as u32
    } else {
        0
    };

    let mut events = Vec::with_capacity(bars as usize * 4);
    for bar in 0..bars {
        let at = origin_secs + f64::from(bar) * BAR_SECS;
        events.push(ScheduledAudioEvent {
            sound: Sound::Kick,
            start_secs: at,
        });
        events.push(ScheduledAudioEvent {
            sound: Sound::Snare,
            start_secs: at + SNARE_OFFSET_SECS,
        });
        if bar % 2 == 0 {
            events.push(ScheduledAudioEvent {
                sound: Sound::Boing,
                start_secs: at + BOING_OFFSET_SECS,
            });
            events.push(ScheduledAudioEvent {
                sound: Sound::Chord {
                    base_hz: CHORD_BASE_HZ,
                },
                start_secs: at,
            });
        }
    }
    events
}

#[cfg(test)]
#[path = "../../tests/unit/audio/schedule.rs"]
mod tests;

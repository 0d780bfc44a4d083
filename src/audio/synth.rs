//! Fixed synthesis recipes for the four backing-track sounds.
//!
//! Every recipe is a pure function of its start sample: rendering the same event twice yields
//! identical samples.

use crate::audio::schedule::Sound;
use crate::foundation::math::SplitMix64;
use std::f64::consts::TAU;

const KICK_LEN_SECS: f64 = 0.26;
const SNARE_LEN_SECS: f64 = 0.2;
const BOING_LEN_SECS: f64 = 0.42;
const CHORD_LEN_SECS: f64 = 0.82;
const CHORD_RATIOS: [f64; 3] = [1.0, 5.0 / 4.0, 3.0 / 2.0];
const SNARE_HIGHPASS_HZ: f64 = 800.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Waveform {
    Sine,
    Triangle,
    Square,
}

impl Waveform {
    /// Sample the waveform at `phase` in `[0, 1)`.
    fn at(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Automation curve: hold `from`, ramp to `to` over `ramp_secs`, then hold `to`.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Ramp {
    Exponential { from: f64, to: f64, ramp_secs: f64 },
    Linear { from: f64, to: f64, ramp_secs: f64 },
}

impl Ramp {
    pub(crate) fn value_at(self, t: f64) -> f64 {
        match self {
            Ramp::Exponential {
                from,
                to,
                ramp_secs,
            } => {
                if t <= 0.0 {
                    from
                } else if t >= ramp_secs {
                    to
                } else {
                    from * (to / from).powf(t / ramp_secs)
                }
            }
            Ramp::Linear {
                from,
                to,
                ramp_secs,
            } => {
                if t <= 0.0 {
                    from
                } else if t >= ramp_secs {
                    to
                } else {
                    from + (to - from) * (t / ramp_secs)
                }
            }
        }
    }
}

/// Oscillator with a frequency curve and a gain envelope.
#[derive(Clone, Copy, Debug)]
struct ToneVoice {
    waveform: Waveform,
    freq: Ramp,
    gain: Ramp,
    len_secs: f64,
}

impl ToneVoice {
    fn render(self, start: usize, sample_rate: u32, out: &mut [f32]) {
        let sr = f64::from(sample_rate);
        let len = (self.len_secs * sr).round() as usize;
        let mut phase = 0.0f64;
        for n in 0..len {
            let Some(slot) = out.get_mut(start + n) else {
                break;
            };
            let t = n as f64 / sr;
            *slot += (self.waveform.at(phase) * self.gain.value_at(t)) as f32;
            phase = (phase + self.freq.value_at(t) / sr).fract();
        }
    }
}

/// Second-order section in direct form I.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// High-pass with cutoff `freq_hz` and resonance `q`.
    pub(crate) fn highpass(sample_rate: u32, freq_hz: f64, q: f64) -> Self {
        let w0 = TAU * freq_hz / f64::from(sample_rate);
        let cos = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos) / 2.0 / a0,
            b1: -(1.0 + cos) / a0,
            b2: (1.0 + cos) / 2.0 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
            ..Self::default()
        }
    }

    pub(crate) fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

fn render_snare(start: usize, sample_rate: u32, out: &mut [f32]) {
    let sr = f64::from(sample_rate);
    let len = (SNARE_LEN_SECS * sr) as usize;
    let gain = Ramp::Exponential {
        from: 1.0,
        to: 0.01,
        ramp_secs: 0.18,
    };
    let mut noise = SplitMix64::new(start as u64);
    let mut filter = Biquad::highpass(sample_rate, SNARE_HIGHPASS_HZ, 1.0);
    for n in 0..len {
        let Some(slot) = out.get_mut(start + n) else {
            break;
        };
        let t = n as f64 / sr;
        let x = f64::from(noise.next_bipolar());
        *slot += (filter.process(x) * gain.value_at(t)) as f32;
    }
}

/// Add one sound into a mono timeline buffer, starting at sample `start`.
///
/// Samples past the end of `out` are dropped.
pub(crate) fn render_sound(sound: &Sound, start: usize, sample_rate: u32, out: &mut [f32]) {
    match *sound {
        Sound::Kick => ToneVoice {
            waveform: Waveform::Sine,
            freq: Ramp::Exponential {
                from: 140.0,
                to: 40.0,
                ramp_secs: 0.2,
            },
            gain: Ramp::Exponential {
                from: 1.0,
                to: 0.001,
                ramp_secs: 0.25,
            },
            len_secs: KICK_LEN_SECS,
        }
        .render(start, sample_rate, out),
        Sound::Snare => render_snare(start, sample_rate, out),
        Sound::Boing => ToneVoice {
            waveform: Waveform::Triangle,
            freq: Ramp::Exponential {
                from: 220.0,
                to: 660.0,
                ramp_secs: 0.15,
            },
            gain: Ramp::Exponential {
                from: 0.6,
                to: 0.0001,
                ramp_secs: 0.4,
            },
            len_secs: BOING_LEN_SECS,
        }
        .render(start, sample_rate, out),
        Sound::Chord { base_hz } => {
            for ratio in CHORD_RATIOS {
                let hz = base_hz * ratio;
                ToneVoice {
                    waveform: Waveform::Square,
                    freq: Ramp::Exponential {
                        from: hz,
                        to: hz,
                        ramp_secs: 0.0,
                    },
                    gain: Ramp::Linear {
                        from: 0.12,
                        to: 0.0,
                        ramp_secs: 0.8,
                    },
                    len_secs: CHORD_LEN_SECS,
                }
                .render(start, sample_rate, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/synth.rs"]
mod tests;

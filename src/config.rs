use crate::foundation::core::Fps;
use crate::foundation::error::{GenError, GenResult};
use std::path::Path;
use std::str::FromStr;

/// Shortest clip the generator produces, in seconds.
pub const MIN_DURATION_SECS: f64 = 3.0;
/// Longest clip the generator produces, in seconds.
pub const MAX_DURATION_SECS: f64 = 20.0;
/// Default clip length.
pub const DEFAULT_DURATION_SECS: f64 = 8.0;
/// Lowest accepted output frame rate.
pub const MIN_FPS: u32 = 24;
/// Highest accepted output frame rate.
pub const MAX_FPS: u32 = 60;
/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 60;

/// Visual theme of the clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Theme {
    /// Vivid gradient cycling quickly through hue space.
    #[default]
    Colorido,
    /// Soft pastel gradient cycling slowly.
    Pastel,
    /// Fixed dark duotone.
    Escuro,
}

impl Theme {
    /// Every theme, in menu order.
    pub const ALL: [Theme; 3] = [Theme::Colorido, Theme::Pastel, Theme::Escuro];

    /// Display name as shown in the theme selector.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Colorido => "Colorido",
            Theme::Pastel => "Pastel",
            Theme::Escuro => "Escuro",
        }
    }

    /// `true` for the dark theme, which swaps most accent colors.
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Escuro)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GenError::validation(format!(
                    "unknown theme \"{s}\" (expected Colorido, Pastel or Escuro)"
                ))
            })
    }
}

/// User-facing generation settings. Immutable for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Clip length in seconds.
    pub duration_secs: f64,
    /// Output frames-per-second.
    pub fps: u32,
    /// Visual theme.
    pub theme: Theme,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            fps: DEFAULT_FPS,
            theme: Theme::default(),
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> GenResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON config document.
    pub fn from_json_str(text: &str) -> GenResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| GenError::validation(format!("invalid config JSON: {e}")))
    }

    /// Bring every field into its accepted range.
    ///
    /// A non-finite duration falls back to the default, like an empty form field would.
    pub fn clamped(self) -> Self {
        let duration_secs = if self.duration_secs.is_finite() {
            self.duration_secs
                .clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
        } else {
            DEFAULT_DURATION_SECS
        };
        Self {
            duration_secs,
            fps: self.fps.clamp(MIN_FPS, MAX_FPS),
            theme: self.theme,
        }
    }

    /// Output frame rate as a validated [`Fps`].
    pub fn frame_rate(&self) -> GenResult<Fps> {
        Fps::new(self.fps)
    }

    /// Duration in milliseconds, the frame loop's stop deadline.
    pub fn total_ms(&self) -> f64 {
        self.duration_secs * 1000.0
    }
}

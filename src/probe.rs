//! Recording-format negotiation.
//!
//! The host is asked, one MIME string at a time, whether it can record that container/codec
//! combination. The first supported entry of a fixed fallback list wins.

use std::collections::BTreeSet;
use std::process::{Command, Stdio};

/// Preferred recording type: VP9 video with Opus audio in WebM.
pub const PREFERRED_MIME: &str = "video/webm;codecs=vp9,opus";

/// Fallbacks tried after the preferred type, most capable first.
pub const FALLBACK_MIMES: [&str; 3] = [
    "video/webm;codecs=vp9,opus",
    "video/webm;codecs=vp8,opus",
    "video/webm",
];

/// Answers whether a MIME/codec string can be recorded on this host.
pub trait CapabilityQuery {
    /// Return `true` when `mime` can be recorded.
    fn is_type_supported(&self, mime: &str) -> bool;
}

/// `ffmpeg` encoders backing one recordable MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecProfile {
    /// MIME string as negotiated.
    pub mime: &'static str,
    /// `ffmpeg` video encoder name.
    pub video_encoder: &'static str,
    /// `ffmpeg` audio encoder name.
    pub audio_encoder: &'static str,
}

const PROFILES: [CodecProfile; 3] = [
    CodecProfile {
        mime: "video/webm;codecs=vp9,opus",
        video_encoder: "libvpx-vp9",
        audio_encoder: "libopus",
    },
    CodecProfile {
        mime: "video/webm;codecs=vp8,opus",
        video_encoder: "libvpx",
        audio_encoder: "libopus",
    },
    CodecProfile {
        mime: "video/webm",
        video_encoder: "libvpx",
        audio_encoder: "libvorbis",
    },
];

/// Look up the encoder pair for a MIME string. Whitespace around `;` and `,` is ignored.
pub fn codec_profile(mime: &str) -> Option<CodecProfile> {
    let wanted = canonical_mime(mime);
    PROFILES.into_iter().find(|p| p.mime == wanted)
}

fn canonical_mime(mime: &str) -> String {
    mime.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Negotiated recording type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimeType(String);

impl MimeType {
    /// Wrap a MIME string without negotiating it.
    pub fn new(mime: impl Into<String>) -> Self {
        Self(mime.into())
    }

    /// The negotiated MIME string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension for downloads of this type.
    pub fn extension(&self) -> &'static str {
        let container = self.0.split(';').next().unwrap_or_default().trim();
        match container {
            "video/mp4" => "mp4",
            "video/x-matroska" => "mkv",
            _ => "webm",
        }
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the first type of `[preferred, ..FALLBACK_MIMES]` the host supports.
///
/// `None` means nothing can be recorded; callers must abort before creating any resources.
pub fn negotiate_mime_type(caps: &dyn CapabilityQuery, preferred: &str) -> Option<MimeType> {
    std::iter::once(preferred)
        .chain(FALLBACK_MIMES)
        .find(|t| caps.is_type_supported(t))
        .map(|t| MimeType(t.to_owned()))
}

/// Capability set backed by the encoders compiled into the system `ffmpeg`.
#[derive(Clone, Debug, Default)]
pub struct FfmpegCapabilities {
    encoders: BTreeSet<String>,
}

impl FfmpegCapabilities {
    /// Query `ffmpeg -encoders` once. A missing or failing `ffmpeg` yields an empty set.
    pub fn detect() -> Self {
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match output {
            Ok(out) if out.status.success() => {
                let caps = Self::from_encoder_listing(&String::from_utf8_lossy(&out.stdout));
                tracing::debug!(encoders = caps.encoders.len(), "ffmpeg encoders detected");
                caps
            }
            Ok(out) => {
                tracing::warn!(status = %out.status, "ffmpeg -encoders failed");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "ffmpeg not found on PATH");
                Self::default()
            }
        }
    }

    /// Parse the table printed by `ffmpeg -encoders`.
    ///
    /// Rows look like ` V....D libvpx-vp9           libvpx VP9 (codec vp9)`; the legend above
    /// the `------` separator is skipped.
    pub fn from_encoder_listing(listing: &str) -> Self {
        let mut encoders = BTreeSet::new();
        let mut in_table = false;
        for line in listing.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("---") {
                in_table = true;
                continue;
            }
            if !in_table {
                continue;
            }
            let mut cols = trimmed.split_whitespace();
            let (Some(flags), Some(name)) = (cols.next(), cols.next()) else {
                continue;
            };
            if flags.len() == 6 && flags.starts_with(['V', 'A', 'S']) {
                encoders.insert(name.to_owned());
            }
        }
        Self { encoders }
    }

    /// Return `true` if `name` is an available encoder.
    pub fn has_encoder(&self, name: &str) -> bool {
        self.encoders.contains(name)
    }
}

impl CapabilityQuery for FfmpegCapabilities {
    fn is_type_supported(&self, mime: &str) -> bool {
        codec_profile(mime)
            .is_some_and(|p| self.has_encoder(p.video_encoder) && self.has_encoder(p.audio_encoder))
    }
}

/// Fixed allow-list of MIME strings.
#[derive(Clone, Debug, Default)]
pub struct StaticCapabilities {
    supported: BTreeSet<String>,
}

impl StaticCapabilities {
    /// Support exactly the given types.
    pub fn new<I, S>(supported: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            supported: supported
                .into_iter()
                .map(|s| canonical_mime(s.as_ref()))
                .collect(),
        }
    }

    /// Support nothing.
    pub fn none() -> Self {
        Self::default()
    }
}

impl CapabilityQuery for StaticCapabilities {
    fn is_type_supported(&self, mime: &str) -> bool {
        self.supported.contains(&canonical_mime(mime))
    }
}

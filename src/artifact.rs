//! Finished recordings and the revocable references handed out for them.

use crate::probe::MimeType;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Base name of downloaded files.
pub const DOWNLOAD_STEM: &str = "video-engracado";

const URL_PREFIX: &str = "blob:video-engracado/";

/// Immutable binary result of one run, tagged with its MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    mime_type: MimeType,
    bytes: Arc<[u8]>,
}

impl Artifact {
    /// Wrap recorded bytes.
    pub fn new(mime_type: MimeType, bytes: Vec<u8>) -> Self {
        Self {
            mime_type,
            bytes: bytes.into(),
        }
    }

    /// MIME type the bytes were recorded as.
    pub fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    /// Container bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Suggested download file name, e.g. `video-engracado.webm`.
    pub fn file_name(&self) -> String {
        format!("{DOWNLOAD_STEM}.{}", self.mime_type.extension())
    }
}

/// Opaque reference to a published [`Artifact`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactUrl(String);

impl ArtifactUrl {
    /// The reference as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out references to artifacts and releases them on request.
///
/// A reference resolves until it is revoked; revoked references never resolve again and their
/// numbers are not reused.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    next_id: u64,
    live: BTreeMap<ArtifactUrl, Arc<Artifact>>,
}

impl ArtifactRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `artifact` under a fresh reference.
    pub fn create_url(&mut self, artifact: Arc<Artifact>) -> ArtifactUrl {
        self.next_id += 1;
        let url = ArtifactUrl(format!("{URL_PREFIX}{}", self.next_id));
        self.live.insert(url.clone(), artifact);
        url
    }

    /// Look up a live reference.
    pub fn resolve(&self, url: &ArtifactUrl) -> Option<Arc<Artifact>> {
        self.live.get(url).cloned()
    }

    /// Release a reference. Returns `false` when it was not live.
    pub fn revoke(&mut self, url: &ArtifactUrl) -> bool {
        self.live.remove(url).is_some()
    }

    /// Number of live references.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

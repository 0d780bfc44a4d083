use crate::foundation::error::{GenError, GenResult};
use crate::probe::MimeType;
use crate::render::surface::FrameRGBA;
use crate::stream::CombinedStream;

/// Encoder contract: consumes sampled frames of a [`CombinedStream`] and yields container chunks.
///
/// Ordering contract: chunks are returned in the order they must appear in the final file.
/// `poll_data` never blocks; `stop` blocks until every remaining chunk is available.
pub trait MediaEncoder: Send {
    /// Called once before any frame is written.
    fn start(&mut self, stream: &CombinedStream, mime: &MimeType) -> GenResult<()>;
    /// Append one output frame of the stream's video track.
    fn write_frame(&mut self, frame: &FrameRGBA) -> GenResult<()>;
    /// Drain the chunks produced so far.
    fn poll_data(&mut self) -> GenResult<Vec<Vec<u8>>>;
    /// Finish the container and return the remaining chunks.
    fn stop(&mut self) -> GenResult<Vec<Vec<u8>>>;
}

/// In-memory encoder for tests and debugging.
///
/// Every frame becomes one 8-byte chunk holding its little-endian sequence number, so the
/// concatenated output spells out the frame order.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    mime: Option<MimeType>,
    track_count: usize,
    frames: u64,
    pending: Vec<Vec<u8>>,
    emit_empty_chunks: bool,
    stopped: bool,
}

impl InMemoryEncoder {
    /// Create a new in-memory encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit a zero-length chunk after every frame, as real encoders sometimes do.
    pub fn with_empty_chunks(mut self) -> Self {
        self.emit_empty_chunks = true;
        self
    }

    /// MIME type captured in `start`, if any.
    pub fn mime_type(&self) -> Option<&MimeType> {
        self.mime.as_ref()
    }

    /// Number of tracks of the stream captured in `start`.
    pub fn track_count(&self) -> usize {
        self.track_count
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

impl MediaEncoder for InMemoryEncoder {
    fn start(&mut self, stream: &CombinedStream, mime: &MimeType) -> GenResult<()> {
        if self.mime.is_some() {
            return Err(GenError::encode("in-memory encoder already started"));
        }
        self.mime = Some(mime.clone());
        self.track_count = stream.tracks().len();
        Ok(())
    }

    fn write_frame(&mut self, _frame: &FrameRGBA) -> GenResult<()> {
        if self.mime.is_none() || self.stopped {
            return Err(GenError::encode("in-memory encoder is not recording"));
        }
        self.pending.push(self.frames.to_le_bytes().to_vec());
        if self.emit_empty_chunks {
            self.pending.push(Vec::new());
        }
        self.frames += 1;
        Ok(())
    }

    fn poll_data(&mut self) -> GenResult<Vec<Vec<u8>>> {
        Ok(std::mem::take(&mut self.pending))
    }

    fn stop(&mut self) -> GenResult<Vec<Vec<u8>>> {
        if self.mime.is_none() || self.stopped {
            return Err(GenError::encode("in-memory encoder is not recording"));
        }
        self.stopped = true;
        Ok(std::mem::take(&mut self.pending))
    }
}

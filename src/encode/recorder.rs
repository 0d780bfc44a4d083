use crate::artifact::Artifact;
use crate::encode::encoder::MediaEncoder;
use crate::foundation::error::{GenError, GenResult};
use crate::probe::MimeType;
use crate::render::surface::FrameRGBA;
use crate::stream::CombinedStream;

/// Append-only list of encoded chunks, concatenated once at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    byte_len: usize,
}

impl ChunkBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Zero-length chunks are dropped; returns whether `chunk` was kept.
    pub fn push(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.byte_len += chunk.len();
        self.chunks.push(chunk);
        true
    }

    /// Number of kept chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// `true` when no chunk was kept.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total bytes over all chunks.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Chunks in arrival order.
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Concatenate the chunks in arrival order.
    pub fn concat(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }
}

/// Lifecycle of a [`Recorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderState {
    /// Created, not started.
    Idle,
    /// Accepting frames and data.
    Recording,
    /// Finished; the artifact has been assembled.
    Stopped,
}

/// Drives a [`MediaEncoder`] and buffers the chunks it yields.
///
/// `Idle -> Recording -> Stopped`, each transition exactly once. Data only lands in the buffer
/// while recording.
pub struct Recorder<E: MediaEncoder> {
    encoder: E,
    mime_type: MimeType,
    state: RecorderState,
    chunks: ChunkBuffer,
    frames: u64,
}

impl<E: MediaEncoder> Recorder<E> {
    /// Recorder for `mime_type`, not yet started.
    pub fn new(encoder: E, mime_type: MimeType) -> Self {
        Self {
            encoder,
            mime_type,
            state: RecorderState::Idle,
            chunks: ChunkBuffer::new(),
            frames: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// MIME type the recording is tagged with.
    pub fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    /// Frames handed to the encoder so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Chunks buffered so far.
    pub fn chunks(&self) -> &ChunkBuffer {
        &self.chunks
    }

    /// Borrow the encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Start recording `stream`.
    pub fn start(&mut self, stream: &CombinedStream) -> GenResult<()> {
        if self.state != RecorderState::Idle {
            return Err(GenError::validation(format!(
                "recorder cannot start from {:?}",
                self.state
            )));
        }
        self.encoder.start(stream, &self.mime_type)?;
        self.state = RecorderState::Recording;
        tracing::debug!(mime = %self.mime_type, "recorder started");
        Ok(())
    }

    /// Data event: append `chunk` if recording and non-empty. Returns whether it was kept.
    pub fn on_data(&mut self, chunk: Vec<u8>) -> bool {
        if self.state != RecorderState::Recording {
            tracing::debug!(len = chunk.len(), state = ?self.state, "dropping chunk outside recording");
            return false;
        }
        self.chunks.push(chunk)
    }

    /// Hand one sampled frame to the encoder and collect whatever it produced.
    pub fn record_frame(&mut self, frame: &FrameRGBA) -> GenResult<()> {
        if self.state != RecorderState::Recording {
            return Err(GenError::validation("recorder is not recording"));
        }
        self.encoder.write_frame(frame)?;
        self.frames += 1;
        for chunk in self.encoder.poll_data()? {
            self.on_data(chunk);
        }
        Ok(())
    }

    /// Stop the encoder, take its final chunks and assemble the artifact.
    ///
    /// Allowed exactly once, from [`RecorderState::Recording`].
    pub fn stop(&mut self) -> GenResult<Artifact> {
        if self.state != RecorderState::Recording {
            return Err(GenError::validation(format!(
                "recorder cannot stop from {:?}",
                self.state
            )));
        }
        let tail = match self.encoder.stop() {
            Ok(tail) => tail,
            Err(e) => {
                self.state = RecorderState::Stopped;
                return Err(e);
            }
        };
        // Trailing data events arrive before the stop event.
        for chunk in tail {
            self.on_data(chunk);
        }
        self.state = RecorderState::Stopped;

        tracing::debug!(
            chunks = self.chunks.len(),
            bytes = self.chunks.byte_len(),
            frames = self.frames,
            "recorder stopped"
        );
        Ok(Artifact::new(self.mime_type.clone(), self.chunks.concat()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/recorder.rs"]
mod tests;

//! Recording: encoders turning the combined stream into container chunks, and the recorder state
//! machine collecting them.

/// Encoder contract and the in-memory encoder.
pub mod encoder;
/// `ffmpeg`-based WebM encoder.
pub mod ffmpeg;
/// Recorder lifecycle and chunk buffer.
pub mod recorder;

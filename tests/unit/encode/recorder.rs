use super::*;
use crate::encode::encoder::InMemoryEncoder;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    }
}

fn recorder() -> Recorder<InMemoryEncoder> {
    Recorder::new(
        InMemoryEncoder::new().with_empty_chunks(),
        MimeType::new("video/webm"),
    )
}

#[test]
fn chunk_buffer_drops_empty_payloads() {
    let mut buf = ChunkBuffer::new();
    assert!(buf.push(vec![1, 2]));
    assert!(!buf.push(Vec::new()));
    assert!(buf.push(vec![3]));
    assert_eq!(buf.len(), 2);
    assert_eq!(buf.byte_len(), 3);
    assert_eq!(buf.concat(), vec![1, 2, 3]);
}

#[test]
fn lifecycle_runs_once() {
    let mut rec = recorder();
    assert_eq!(rec.state(), RecorderState::Idle);
    assert!(rec.record_frame(&frame()).is_err());
    assert!(rec.stop().is_err());

    rec.start(&CombinedStream::new()).unwrap();
    assert_eq!(rec.state(), RecorderState::Recording);
    assert!(rec.start(&CombinedStream::new()).is_err());

    for _ in 0..3 {
        rec.record_frame(&frame()).unwrap();
    }
    // Empty chunks emitted by the encoder never reach the buffer.
    assert_eq!(rec.chunks().len(), 3);

    let artifact = rec.stop().unwrap();
    assert_eq!(rec.state(), RecorderState::Stopped);
    assert_eq!(artifact.mime_type().as_str(), "video/webm");
    assert!(rec.stop().is_err());
    assert!(!rec.on_data(vec![9]));
}

#[test]
fn artifact_keeps_arrival_order() {
    let mut rec = recorder();
    rec.start(&CombinedStream::new()).unwrap();
    for _ in 0..5 {
        rec.record_frame(&frame()).unwrap();
    }
    assert!(rec.on_data(vec![0xff]));
    let artifact = rec.stop().unwrap();

    let bytes = artifact.bytes();
    assert_eq!(bytes.len(), 5 * 8 + 1);
    for (i, chunk) in bytes[..40].chunks_exact(8).enumerate() {
        let mut le = [0u8; 8];
        le.copy_from_slice(chunk);
        assert_eq!(u64::from_le_bytes(le), i as u64);
    }
    assert_eq!(bytes[40], 0xff);
}

#[test]
fn data_before_start_is_ignored() {
    let mut rec = recorder();
    assert!(!rec.on_data(vec![1, 2, 3]));
    assert!(rec.chunks().is_empty());
}

use crate::audio::context::write_f32le_file;
use crate::encode::encoder::MediaEncoder;
use crate::foundation::error::{GenError, GenResult};
use crate::foundation::math::mul_div255_u16;
use crate::probe::{MimeType, codec_profile};
use crate::render::surface::FrameRGBA;
use crate::stream::CombinedStream;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};

const STDOUT_CHUNK_BYTES: usize = 64 * 1024;

static SCRATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Options for [`FfmpegEncoder`].
#[derive(Clone, Debug)]
pub struct FfmpegEncoderOpts {
    /// Directory for the raw PCM scratch file handed to `ffmpeg`.
    pub scratch_dir: PathBuf,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl Default for FfmpegEncoderOpts {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Encoder that spawns the system `ffmpeg`, streams raw frames to stdin and reads WebM from
/// stdout.
///
/// The audio track is written to a scratch `f32le` file up front and muxed in as a second input.
/// Stdout is read on a helper thread in fixed-size chunks so `ffmpeg` never blocks on a full pipe.
pub struct FfmpegEncoder {
    opts: FfmpegEncoderOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_rx: Option<Receiver<std::io::Result<Vec<u8>>>>,
    stdout_reader: Option<std::thread::JoinHandle<()>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    audio_path: Option<PathBuf>,
    frame_size: Option<(u32, u32)>,
}

impl FfmpegEncoder {
    /// Create a new encoder that streams into `ffmpeg`.
    pub fn new(opts: FfmpegEncoderOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stdout_rx: None,
            stdout_reader: None,
            stderr_drain: None,
            scratch: Vec::new(),
            audio_path: None,
            frame_size: None,
        }
    }

    fn scratch_audio_path(&self) -> PathBuf {
        let seq = SCRATCH_SEQ.fetch_add(1, Ordering::Relaxed);
        self.opts.scratch_dir.join(format!(
            "video-engracado-{}-{seq}.f32le",
            std::process::id()
        ))
    }

    fn drain_stdout(&mut self, block: bool) -> GenResult<Vec<Vec<u8>>> {
        let Some(rx) = self.stdout_rx.as_ref() else {
            return Ok(Vec::new());
        };
        let mut chunks = Vec::new();
        let mut disconnected = false;
        loop {
            let next = if block {
                rx.recv().map_err(|_| TryRecvError::Disconnected)
            } else {
                rx.try_recv()
            };
            match next {
                Ok(Ok(chunk)) => chunks.push(chunk),
                Ok(Err(e)) => {
                    return Err(GenError::encode(format!("failed to read ffmpeg stdout: {e}")));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            self.stdout_rx = None;
        }
        Ok(chunks)
    }

    fn remove_scratch(&mut self) {
        if let Some(path) = self.audio_path.take()
            && let Err(e) = std::fs::remove_file(&path)
        {
            tracing::debug!(path = %path.display(), error = %e, "failed to remove audio scratch file");
        }
    }
}

impl MediaEncoder for FfmpegEncoder {
    fn start(&mut self, stream: &CombinedStream, mime: &MimeType) -> GenResult<()> {
        if self.child.is_some() {
            return Err(GenError::encode("ffmpeg encoder already started"));
        }
        let profile = codec_profile(mime.as_str()).ok_or(GenError::UnsupportedFormat)?;

        let mut videos = stream.video_tracks();
        let video = videos
            .next()
            .ok_or_else(|| GenError::validation("stream has no video track"))?;
        if videos.next().is_some() {
            return Err(GenError::validation("stream must have exactly one video track"));
        }
        let (width, height) = (video.canvas.width, video.canvas.height);
        if width == 0 || height == 0 {
            return Err(GenError::validation("ffmpeg encoder width/height must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(GenError::validation(
                "ffmpeg encoder width/height must be even (required for yuv420p output)",
            ));
        }

        if !is_ffmpeg_on_path() {
            return Err(GenError::encode(
                "ffmpeg is required for WebM encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Input 0: raw premultiplied RGBA8 frames, flattened in `write_frame`.
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &video.fps.get().to_string(),
            "-i",
            "pipe:0",
        ]);

        let audio = stream.audio_tracks().next();
        if let Some(audio) = audio {
            if audio.sample_rate == 0 || audio.channels == 0 {
                return Err(GenError::validation(
                    "audio sample_rate and channels must be non-zero",
                ));
            }
            let path = self.scratch_audio_path();
            write_f32le_file(&audio.samples, &path)?;
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&path)
            .args(["-c:a", profile.audio_encoder]);
            self.audio_path = Some(path);
        } else {
            cmd.arg("-an");
        }

        cmd.args([
            "-c:v",
            profile.video_encoder,
            "-pix_fmt",
            "yuv420p",
            "-deadline",
            "realtime",
            "-f",
            "webm",
            "pipe:1",
        ]);
        tracing::debug!(?cmd, "spawning ffmpeg");

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.remove_scratch();
                return Err(GenError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                )));
            }
        };

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GenError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| GenError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| GenError::encode("failed to open ffmpeg stderr (unexpected)"))?;

        let (tx, rx) = std::sync::mpsc::channel();
        let stdout_reader = std::thread::spawn(move || {
            let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(Ok(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; (width as usize) * (height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_rx = Some(rx);
        self.stdout_reader = Some(stdout_reader);
        self.stderr_drain = Some(stderr_drain);
        self.frame_size = Some((width, height));
        Ok(())
    }

    fn write_frame(&mut self, frame: &FrameRGBA) -> GenResult<()> {
        let (width, height) = self
            .frame_size
            .ok_or_else(|| GenError::encode("ffmpeg encoder not started"))?;
        if frame.width != width || frame.height != height {
            return Err(GenError::validation(format!(
                "frame size mismatch: got {}x{}, expected {width}x{height}",
                frame.width, frame.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(GenError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(GenError::encode("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| GenError::encode(format!("failed to write frame to ffmpeg stdin: {e}")))?;
        Ok(())
    }

    fn poll_data(&mut self) -> GenResult<Vec<Vec<u8>>> {
        self.drain_stdout(false)
    }

    fn stop(&mut self) -> GenResult<Vec<Vec<u8>>> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| GenError::encode("ffmpeg encoder not started"))?;

        // Stdout closes when ffmpeg exits, which ends the blocking drain.
        let chunks = self.drain_stdout(true);
        if let Some(handle) = self.stdout_reader.take()
            && handle.join().is_err()
        {
            return Err(GenError::encode("ffmpeg stdout reader thread panicked"));
        }

        let status = child
            .wait()
            .map_err(|e| GenError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| GenError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| GenError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.remove_scratch();
        self.frame_size = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(GenError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        chunks
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.remove_scratch();
    }
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> GenResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(GenError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (s[0] as u16 + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (s[1] as u16 + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (s[2] as u16 + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> GenResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

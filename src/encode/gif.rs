use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::encode::sink::{FrameSink, SinkConfig, stream_frames};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BongoError, BongoResult};
use crate::render::frame::FrameRGBA;

/// Default per-frame delay.
pub const DEFAULT_DELAY_MS: u32 = 200;
/// Default NeuQuant sample factor.
pub const DEFAULT_QUALITY: i32 = 10;
/// Accepted NeuQuant sample factors; lower is slower and more faithful.
pub const QUALITY_RANGE: std::ops::RangeInclusive<i32> = 1..=30;

/// Timing, looping and palette-reduction settings shared by every frame of one animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationParams {
    /// Loop count; `0` loops forever.
    pub repeat: u16,
    /// Display time of each frame in milliseconds, stored at centisecond precision.
    pub delay_ms: u32,
    /// NeuQuant sample factor in [`QUALITY_RANGE`].
    pub quality: i32,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            repeat: 0,
            delay_ms: DEFAULT_DELAY_MS,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl AnimationParams {
    pub fn validate(&self) -> BongoResult<()> {
        if !QUALITY_RANGE.contains(&self.quality) {
            return Err(BongoError::validation(format!(
                "quality must be in {}..={}, got {}",
                QUALITY_RANGE.start(),
                QUALITY_RANGE.end(),
                self.quality
            )));
        }
        self.delay_centis()?;
        Ok(())
    }

    /// GIF frame delay in hundredths of a second, rounded to nearest.
    pub fn delay_centis(&self) -> BongoResult<u16> {
        let centis = self.delay_ms / 10 + u32::from(self.delay_ms % 10 >= 5);
        u16::try_from(centis).map_err(|_| {
            BongoError::validation(format!(
                "delay_ms {} does not fit in a GIF frame delay",
                self.delay_ms
            ))
        })
    }

    fn gif_repeat(&self) -> gif::Repeat {
        match self.repeat {
            0 => gif::Repeat::Infinite,
            n => gif::Repeat::Finite(n),
        }
    }
}

/// Sink that multiplexes frames into an animated GIF written to `W`.
///
/// The header is written in `begin`, one image block per `push_frame`, and the trailer plus a
/// flush in `end`. Dropping the sink early releases the writer; whatever was written is then
/// incomplete.
pub struct GifSink<W: Write> {
    params: AnimationParams,
    writer: Option<W>,
    encoder: Option<gif::Encoder<W>>,
    cfg: Option<SinkConfig>,
    dims: (u16, u16),
    delay: u16,
    last_idx: Option<FrameIndex>,
    frames_written: u32,
    scratch: Vec<u8>,
}

impl<W: Write> GifSink<W> {
    pub fn new(writer: W, params: AnimationParams) -> Self {
        Self {
            params,
            writer: Some(writer),
            encoder: None,
            cfg: None,
            dims: (0, 0),
            delay: 0,
            last_idx: None,
            frames_written: 0,
            scratch: Vec::new(),
        }
    }

    /// Number of frames encoded so far.
    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Recover the writer after a successful `end`.
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl<W: Write> FrameSink for GifSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> BongoResult<()> {
        self.params.validate()?;
        let (Ok(w), Ok(h)) = (u16::try_from(cfg.width), u16::try_from(cfg.height)) else {
            return Err(BongoError::validation(format!(
                "{}x{} exceeds the GIF maximum of 65535x65535",
                cfg.width, cfg.height
            )));
        };
        if w == 0 || h == 0 {
            return Err(BongoError::validation(
                "gif sink width/height must be non-zero",
            ));
        }

        let writer = self
            .writer
            .take()
            .ok_or_else(|| BongoError::validation("gif sink was already started"))?;
        let mut encoder = gif::Encoder::new(writer, w, h, &[]).map_err(map_gif_err)?;
        encoder
            .set_repeat(self.params.gif_repeat())
            .map_err(map_gif_err)?;

        self.delay = self.params.delay_centis()?;
        self.dims = (w, h);
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BongoResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| BongoError::validation("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(BongoError::validation(format!(
                "frames must be pushed in increasing order (got {} after {})",
                idx.0, last.0
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(BongoError::FrameDimensionMismatch {
                expected: (cfg.width, cfg.height),
                got: (frame.width, frame.height),
            });
        }
        if frame.data.len() != frame.canvas().rgba8_len()? {
            return Err(BongoError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| BongoError::validation("gif sink is already finalized"))?;

        // Quantization reorders the pixel buffer in place, so feed it a scratch copy.
        self.scratch.clear();
        self.scratch.extend_from_slice(&frame.data);
        let (w, h) = self.dims;
        let mut gif_frame =
            gif::Frame::from_rgba_speed(w, h, &mut self.scratch, self.params.quality);
        gif_frame.delay = self.delay;
        // Transparent pixels must not reveal the previous pose.
        gif_frame.dispose = gif::DisposalMethod::Background;
        encoder.write_frame(&gif_frame).map_err(map_gif_err)?;

        self.last_idx = Some(idx);
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> BongoResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| BongoError::validation("gif sink not started"))?;
        let mut writer = encoder
            .into_inner()
            .map_err(|e| BongoError::encode_io(format!("failed to write gif trailer: {e}")))?;
        writer
            .flush()
            .map_err(|e| BongoError::encode_io(format!("failed to flush gif output: {e}")))?;
        self.writer = Some(writer);
        Ok(())
    }
}

fn map_gif_err(e: gif::EncodingError) -> BongoError {
    match e {
        gif::EncodingError::Io(io) => BongoError::encode_io(io.to_string()),
        other => BongoError::validation(format!("gif encoding failed: {other}")),
    }
}

/// Encode `frames` as one animated GIF into `writer` and hand the writer back once the trailer
/// has been written and flushed.
#[tracing::instrument(skip(frames, writer))]
pub fn encode<I, W>(frames: I, params: &AnimationParams, writer: W) -> BongoResult<W>
where
    I: IntoIterator<Item = FrameRGBA>,
    W: Write,
{
    let mut sink = GifSink::new(writer, *params);
    let n = stream_frames(frames, &mut sink)?;
    tracing::debug!(frames = n, "encoded gif");
    sink.into_inner()
        .ok_or_else(|| BongoError::encode_io("gif writer was not returned after finalize"))
}

/// Encode `frames` into a GIF file at `path`, returning the byte size of the finished file.
///
/// The file is synced to disk before this returns. On error the file may exist with partial
/// contents; removing it is up to the caller.
pub fn encode_to_path<I>(frames: I, params: &AnimationParams, path: &Path) -> BongoResult<u64>
where
    I: IntoIterator<Item = FrameRGBA>,
{
    params.validate()?;
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        BongoError::encode_io(format!("failed to create '{}': {e}", path.display()))
    })?;

    let buffered = encode(frames, params, BufWriter::new(file))?;
    let file = buffered.into_inner().map_err(|e| {
        BongoError::encode_io(format!("failed to flush '{}': {}", path.display(), e.error()))
    })?;
    file.sync_all().map_err(|e| {
        BongoError::encode_io(format!("failed to sync '{}': {e}", path.display()))
    })?;

    let len = file
        .metadata()
        .map_err(|e| BongoError::encode_io(format!("failed to stat '{}': {e}", path.display())))?
        .len();
    Ok(len)
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> BongoResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            BongoError::encode_io(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;

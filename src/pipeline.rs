use std::io::{self, Write};
use std::path::Path;

use crate::{
    assets::decode::{SourceImage, decode_image, load_image},
    config::BongoConfig,
    encode::gif::{encode, encode_to_path},
    foundation::error::BongoResult,
    render::synth::synthesize_with,
};

/// Summary of one successful decode -> synthesize -> encode run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ProcessReport {
    /// Source (and output) width in pixels.
    pub width: u32,
    /// Source (and output) height in pixels.
    pub height: u32,
    /// Frames in the animation.
    pub frame_count: u32,
    /// Size of the encoded GIF in bytes.
    pub bytes_written: u64,
}

/// Synthesize and encode an already-decoded image into `writer`.
///
/// Returns the writer once the GIF trailer has been written and flushed.
#[tracing::instrument(skip(image, cfg, writer), fields(width = image.width(), height = image.height()))]
pub fn process_image<W: Write>(
    image: &SourceImage,
    cfg: &BongoConfig,
    writer: W,
) -> BongoResult<(ProcessReport, W)> {
    cfg.validate()?;
    let frames = synthesize_with(image, &cfg.synth)?;
    let frame_count = frames.len() as u32;

    let counted = encode(frames, &cfg.animation, CountingWriter::new(writer))?;
    let report = ProcessReport {
        width: image.width(),
        height: image.height(),
        frame_count,
        bytes_written: counted.count,
    };
    tracing::info!(?report, "processed image");
    Ok((report, counted.inner))
}

/// Decode `bytes` and run the full pipeline into `writer`.
pub fn process_bytes<W: Write>(
    bytes: &[u8],
    cfg: &BongoConfig,
    writer: W,
) -> BongoResult<(ProcessReport, W)> {
    let image = decode_image(bytes)?;
    process_image(&image, cfg, writer)
}

/// Decode `input` and write the animated GIF to `output`.
///
/// The output is synced to disk before this returns `Ok`. On error a partial file may be left
/// behind at `output`; callers should delete it.
#[tracing::instrument(skip(cfg))]
pub fn process_file(input: &Path, output: &Path, cfg: &BongoConfig) -> BongoResult<ProcessReport> {
    cfg.validate()?;
    let image = load_image(input)?;
    process_image_to_path(&image, output, cfg)
}

/// Decode uploaded `bytes` and write the animated GIF to `output`.
///
/// Same completion and cleanup contract as [`process_file`].
pub fn process_bytes_to_path(
    bytes: &[u8],
    output: &Path,
    cfg: &BongoConfig,
) -> BongoResult<ProcessReport> {
    cfg.validate()?;
    let image = decode_image(bytes)?;
    process_image_to_path(&image, output, cfg)
}

fn process_image_to_path(
    image: &SourceImage,
    output: &Path,
    cfg: &BongoConfig,
) -> BongoResult<ProcessReport> {
    let frames = synthesize_with(image, &cfg.synth)?;
    let frame_count = frames.len() as u32;
    let bytes_written = encode_to_path(frames, &cfg.animation, output)?;

    let report = ProcessReport {
        width: image.width(),
        height: image.height(),
        frame_count,
        bytes_written,
    };
    tracing::info!(?report, output = %output.display(), "processed image");
    Ok(report)
}

struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;

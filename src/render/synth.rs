use rayon::prelude::*;

use crate::{
    assets::decode::SourceImage,
    effects::composite::fill_rect_in_place,
    foundation::core::FrameIndex,
    foundation::error::{BongoError, BongoResult},
    render::frame::FrameRGBA,
    render::rig::{DrumKit, Palette},
};

/// Frames per drumming cycle unless configured otherwise.
pub const DEFAULT_FRAME_COUNT: u32 = 8;

/// Options for [`synthesize_with`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SynthOpts {
    /// Number of frames in one drumming cycle. Must be >= 1.
    pub frame_count: u32,
    /// Overlay colors.
    pub palette: Palette,
    /// Synthesize frames on a dedicated rayon pool. Output is identical either way.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for SynthOpts {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            palette: Palette::default(),
            parallel: false,
            threads: None,
        }
    }
}

impl SynthOpts {
    pub fn validate(&self) -> BongoResult<()> {
        if self.frame_count == 0 {
            return Err(BongoError::validation("frame_count must be >= 1"));
        }
        if self.threads == Some(0) {
            return Err(BongoError::validation("'threads' must be >= 1 when set"));
        }
        Ok(())
    }
}

/// Synthesize `frame_count` frames with the default palette.
pub fn synthesize(image: &SourceImage, frame_count: u32) -> BongoResult<Vec<FrameRGBA>> {
    synthesize_with(
        image,
        &SynthOpts {
            frame_count,
            ..SynthOpts::default()
        },
    )
}

/// Synthesize the full drumming cycle for `image`.
///
/// Frames are returned in index order. Each one is a fresh copy of the source with both arms,
/// the drum and the two sticks composited on top. The result is a pure function of the image and
/// options.
#[tracing::instrument(
    skip(image, opts),
    fields(width = image.width(), height = image.height(), frames = opts.frame_count)
)]
pub fn synthesize_with(image: &SourceImage, opts: &SynthOpts) -> BongoResult<Vec<FrameRGBA>> {
    opts.validate()?;
    image.ensure_min_size()?;

    let kit = DrumKit::new(image.canvas(), opts.palette);
    let n = opts.frame_count;

    let frames = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            (0..n)
                .into_par_iter()
                .map(|i| synthesize_frame(image, &kit, FrameIndex(i), n))
                .collect::<BongoResult<Vec<_>>>()
        })?
    } else {
        (0..n)
            .map(|i| synthesize_frame(image, &kit, FrameIndex(i), n))
            .collect::<BongoResult<Vec<_>>>()?
    };

    tracing::debug!(frames = frames.len(), parallel = opts.parallel, "synthesized frames");
    Ok(frames)
}

/// Synthesize a single frame of an `opts.frame_count`-frame cycle.
pub fn render_frame(
    image: &SourceImage,
    index: FrameIndex,
    opts: &SynthOpts,
) -> BongoResult<FrameRGBA> {
    opts.validate()?;
    image.ensure_min_size()?;
    if index.0 >= opts.frame_count {
        return Err(BongoError::validation(format!(
            "frame index {} is out of range for {} frames",
            index.0, opts.frame_count
        )));
    }
    let kit = DrumKit::new(image.canvas(), opts.palette);
    synthesize_frame(image, &kit, index, opts.frame_count)
}

/// Composite every overlay for `index` onto a copy of `image`.
pub fn synthesize_frame(
    image: &SourceImage,
    kit: &DrumKit,
    index: FrameIndex,
    frame_count: u32,
) -> BongoResult<FrameRGBA> {
    let canvas = image.canvas();
    if kit.canvas() != canvas {
        return Err(BongoError::validation(
            "drum kit layout was built for a different source size",
        ));
    }

    let mut data = image.rgba8().to_vec();
    for rect in kit.overlays(index, frame_count) {
        fill_rect_in_place(&mut data, canvas, &rect)?;
    }

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

fn build_thread_pool(threads: Option<usize>) -> BongoResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BongoError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/synth.rs"]
mod tests;

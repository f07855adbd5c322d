use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BongoError, BongoResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels, taken from the first frame.
    pub width: u32,
    /// Output height in pixels, taken from the first frame.
    pub height: u32,
}

/// Sink contract for consuming synthesized frames in playback order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order. Output is
/// only usable once `end` has returned `Ok`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BongoResult<()>;
    /// Push one frame in strictly increasing index order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BongoResult<()>;
    /// Called once after the last frame is pushed; finalizes and flushes the output.
    fn end(&mut self) -> BongoResult<()>;
}

/// Feed `frames` through `sink` in order: `begin` with the first frame's size, every frame, `end`.
///
/// Each frame is dropped right after it is pushed. Returns the number of frames written.
pub fn stream_frames<I>(frames: I, sink: &mut dyn FrameSink) -> BongoResult<u32>
where
    I: IntoIterator<Item = FrameRGBA>,
{
    let mut frames = frames.into_iter().peekable();
    let first = frames
        .peek()
        .ok_or_else(|| BongoError::validation("cannot encode an empty frame sequence"))?;
    sink.begin(SinkConfig {
        width: first.width,
        height: first.height,
    })?;

    let mut count = 0u32;
    for frame in frames {
        sink.push_frame(FrameIndex(count), &frame)?;
        count += 1;
    }
    sink.end()?;
    Ok(count)
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BongoResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BongoResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BongoResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;

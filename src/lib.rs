//! Bongo Cat turns a still image into a looping animated GIF.
//!
//! The pipeline is one-way:
//!
//! - Decode a [`SourceImage`]
//! - [`synthesize`] N frames, each with two drumming arms and a static drum kit composited on top
//! - [`encode`] the frames, in order, into an animated GIF through a [`FrameSink`]
//!
//! [`process_file`] and [`process_bytes`] run all three steps; [`server`] wraps them in an HTTP
//! upload service.
#![forbid(unsafe_code)]

/// Source image decoding.
pub mod assets;
/// Closed-form arm motion.
pub mod animation;
/// Processing configuration.
pub mod config;
/// Pixel compositing.
pub mod effects;
/// Frame sinks and GIF encoding.
pub mod encode;
mod foundation;
/// Decode -> synthesize -> encode entry points.
pub mod pipeline;
/// Frame synthesis.
pub mod render;
/// HTTP upload service.
pub mod server;

pub use crate::foundation::core::{Canvas, FrameIndex, Rgba8};
pub use crate::foundation::error::{BongoError, BongoResult};

pub use crate::animation::motion::{ArmAngles, arm_angles};
pub use crate::assets::decode::{MIN_SOURCE_DIM, SourceImage, decode_image, load_image};
pub use crate::config::BongoConfig;
pub use crate::effects::composite::{OverlayRect, fill_rect_in_place};
pub use crate::encode::gif::{AnimationParams, GifSink, encode, encode_to_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, stream_frames};
pub use crate::pipeline::{
    ProcessReport, process_bytes, process_bytes_to_path, process_file, process_image,
};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::rig::{DrumKit, Palette};
pub use crate::render::synth::{
    DEFAULT_FRAME_COUNT, SynthOpts, render_frame, synthesize, synthesize_frame, synthesize_with,
};
pub use crate::server::{ProcessingStats, ServerConfig, StatsSnapshot};

//! Encoding sinks.
//!
//! Sinks consume synthesized frames in playback order.

/// Animated GIF output.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

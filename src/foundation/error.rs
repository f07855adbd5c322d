/// Convenience result type used across the crate.
pub type BongoResult<T> = Result<T, BongoError>;

/// Top-level error taxonomy for decoding, synthesis and encoding.
#[derive(thiserror::Error, Debug)]
pub enum BongoError {
    /// Invalid configuration values (frame count, quality, delay, thread count).
    #[error("validation error: {0}")]
    Validation(String),

    /// The source image is unusable, e.g. below the minimum dimension floor.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input bytes could not be decoded as a raster image.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// The output sink could not be written, flushed or finalized.
    ///
    /// Anything already written to the sink must be treated as invalid.
    #[error("encode io error: {0}")]
    EncodeIo(String),

    /// A frame disagrees in size with the rest of the sequence.
    #[error(
        "frame dimension mismatch: expected {}x{}, got {}x{}",
        expected.0,
        expected.1,
        got.0,
        got.1
    )]
    FrameDimensionMismatch {
        /// Width/height fixed by the first frame.
        expected: (u32, u32),
        /// Width/height of the offending frame.
        got: (u32, u32),
    },

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BongoError {
    /// Build a [`BongoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BongoError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`BongoError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`BongoError::EncodeIo`] value.
    pub fn encode_io(msg: impl Into<String>) -> Self {
        Self::EncodeIo(msg.into())
    }

    /// Build a [`BongoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` when the error is caused by the caller's input rather than the system.
    ///
    /// The HTTP layer maps these to `400 Bad Request`.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::ImageDecode(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

use thiserror::Error;

/// Errors reported by the matting engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MattingError {
    /// Image width or height is zero, or the pixel count does not fit in memory
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// An input channel does not hold exactly width*height samples
    #[error("channel {channel} has {actual} samples, expected {expected}")]
    ChannelLength {
        channel: char,
        expected: usize,
        actual: usize,
    },

    /// A scribble coordinate lies outside the image; the whole scribble is rejected
    #[error("scribble point ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// A caller-provided output buffer has the wrong length
    #[error("output buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MattingError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("rectangle ({width}x{height}) does not fit a {bin_width}x{bin_height} bin")]
    RectangleTooLarge {
        width: u32,
        height: u32,
        bin_width: u32,
        bin_height: u32,
    },

    #[error("invalid bin dimensions: width and height must be greater than 0 (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unknown heuristic code: {0:?}")]
    UnknownHeuristic(String),
}

pub type Result<T> = std::result::Result<T, PackError>;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Invalid input image: {width}x{height}")]
    InvalidInput { width: u32, height: u32 },

    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to load font: {0}")]
    Font(String),

    #[error("Output directory is not empty: {}", .0.display())]
    OutputDirNotEmpty(PathBuf),
}

pub type Result<T> = std::result::Result<T, ShapeError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Point loop is not closed ({count} points picked)")]
    IncompleteLoop { count: usize },
}

pub type Result<T> = std::result::Result<T, ViewerError>;

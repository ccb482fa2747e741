//! Pan/zoom single-image viewer for picking the four corners of a
//! quadrilateral and saving them beside the image.

pub mod annotation;
pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod input;
pub mod render;
pub mod viewport;

pub use error::{Result, ViewerError};

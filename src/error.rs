// Crate error type. Every variant states *where* things went wrong.
//
// Only window problems are fatal (no surface = nothing to show). Image
// decode failures are reported through this type too, but the loader
// swallows them after logging; a missing picture never stops the loop.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),

    #[error("failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

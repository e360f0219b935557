//! Photo normalization for inline storage.
//!
//! Turns an arbitrary user-supplied image into a size-bounded JPEG `data:` URL
//! that can be stored directly inside a record, with no external file
//! reference.

mod dimensions;
mod normalize;
mod orientation;

pub use dimensions::fit_within;
pub use normalize::{
    decode_data_url, normalize_bytes, normalize_file, EncodedImage, NormalizeOptions,
};
pub use orientation::{apply_orientation, read_orientation, Orientation};

use std::path::PathBuf;

/// Errors that can occur while normalizing a photo.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// JPEG encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The blocking decode task did not complete.
    #[error("image task failed: {0}")]
    Task(String),
}

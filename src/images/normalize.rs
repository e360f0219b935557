//! Photo normalization: bound the dimensions, then search JPEG quality until
//! the encoded `data:` URL fits the size budget.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use super::dimensions::fit_within;
use super::orientation::{apply_orientation, read_orientation};
use super::NormalizeError;
use crate::config::ImageConfig;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Tuning for [`normalize_file`] and [`normalize_bytes`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOptions {
    /// Longest side of the output, in pixels.
    pub max_dimension: u32,
    /// Budget in MiB, measured in characters of the encoded `data:` URL.
    pub max_size_mb: f64,
    /// JPEG quality of the first attempt (1-100).
    pub initial_quality: u8,
    /// Quality floor; the search stops here whatever the size.
    pub min_quality: u8,
    /// Quality decrement between attempts. Zero is treated as one.
    pub quality_step: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&ImageConfig::default())
    }
}

impl From<&ImageConfig> for NormalizeOptions {
    fn from(config: &ImageConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            max_size_mb: config.max_size_mb,
            initial_quality: config.initial_quality,
            min_quality: config.min_quality,
            quality_step: config.quality_step,
        }
    }
}

impl NormalizeOptions {
    pub fn with_max_size_mb(mut self, max_size_mb: f64) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    /// Size budget in encoded characters.
    pub fn budget(&self) -> usize {
        (self.max_size_mb * 1024.0 * 1024.0) as usize
    }
}

/// A normalized photo, ready to embed in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Self-contained `data:image/jpeg;base64,...` string.
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    /// JPEG quality of the returned encoding.
    pub quality: u8,
    /// Number of encodings performed.
    pub attempts: u32,
}

impl EncodedImage {
    /// Whether the result is within `budget` characters.
    pub fn fits(&self, budget: usize) -> bool {
        self.data_url.len() <= budget
    }

    pub fn into_data_url(self) -> String {
        self.data_url
    }
}

/// Read an image file and normalize it.
///
/// The file read is async; decoding and the encode loop run on the blocking
/// pool.
pub async fn normalize_file(
    path: &Path,
    options: &NormalizeOptions,
) -> Result<EncodedImage, NormalizeError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| NormalizeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let options = options.clone();
    tokio::task::spawn_blocking(move || normalize_bytes(&data, &options))
        .await
        .map_err(|e| NormalizeError::Task(e.to_string()))?
}

/// Decode, orient, resize, and encode an in-memory image.
///
/// Fails only if the bytes are not a decodable image or encoding breaks.
/// Exceeding the budget is not an error: the result at the quality floor is
/// returned as is.
pub fn normalize_bytes(
    data: &[u8],
    options: &NormalizeOptions,
) -> Result<EncodedImage, NormalizeError> {
    let mut img = image::load_from_memory(data).map_err(NormalizeError::Decode)?;

    if let Some(orientation) = read_orientation(data) {
        img = apply_orientation(img, orientation);
    }

    let (width, height) = fit_within(img.width(), img.height(), options.max_dimension);
    let raster = render(&img, width, height);

    let budget = options.budget();
    let step = options.quality_step.max(1);
    let mut quality = options.initial_quality;
    let mut data_url = encode_data_url(&raster, quality)?;
    let mut attempts = 1;

    while data_url.len() > budget && quality > options.min_quality {
        quality = quality.saturating_sub(step).max(options.min_quality);
        data_url = encode_data_url(&raster, quality)?;
        attempts += 1;
    }

    tracing::debug!(
        width,
        height,
        quality,
        attempts,
        chars = data_url.len(),
        budget,
        "Normalized photo"
    );

    Ok(EncodedImage {
        data_url,
        width,
        height,
        quality,
        attempts,
    })
}

/// Draw the image at the target size onto an opaque RGB surface.
fn render(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
    if (width, height) == (img.width(), img.height()) {
        img.to_rgb8()
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3).to_rgb8()
    }
}

fn encode_data_url(raster: &RgbImage, quality: u8) -> Result<String, NormalizeError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    raster
        .write_with_encoder(encoder)
        .map_err(NormalizeError::Encode)?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(buf.into_inner());
    Ok(format!("{}{}", DATA_URL_PREFIX, encoded))
}

/// Decode the JPEG bytes embedded in a data URL produced by this module.
pub fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let payload = data_url.strip_prefix(DATA_URL_PREFIX)?;
    base64::engine::general_purpose::STANDARD.decode(payload).ok()
}

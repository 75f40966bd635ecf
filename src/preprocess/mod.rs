//! Image-to-tensor preprocessing.
//!
//! Converts an arbitrary decoded image into the packed NHWC `u8` buffer a
//! quantized classifier expects:
//! - reject empty images and sources with too few color components
//! - resample to exactly `width x height`
//! - drop alpha and write R, G, B per pixel in row-major order

mod load;

pub use load::{collect_image_files, load_image, probe_dimensions, IMAGE_EXTENSIONS};

use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::QuantclassError;
use crate::tensor::{InputTensorBytes, TensorShape};

/// Largest target surface, in pixels, that will be resampled (16384x16384).
pub const MAX_TARGET_PIXELS: u64 = 1 << 28;

/// Bytes per pixel of the `Rgba<f32>` buffer `imageops::resize` samples into.
const RESIZE_INTERMEDIATE_BYTES_PER_PIXEL: u64 = 16;

/// Resampling filter used to scale the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Bilinear (triangle) filtering.
    #[default]
    Bilinear,
    /// Catmull-Rom cubic filtering.
    CatmullRom,
    /// Gaussian filtering.
    Gaussian,
    /// Lanczos with window 3.
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Options for preprocessing behavior.
#[derive(Clone, Debug, Default)]
pub struct PreprocessOptions {
    /// Filter used when the source is not already at the target size.
    pub filter: ResizeFilter,
}

/// Converts `image` into an input tensor of `shape` using default options.
///
/// # Errors
/// - [`QuantclassError::EmptyImage`] if the source has zero width or height
/// - [`QuantclassError::UnsupportedFormat`] if the source has fewer color
///   components than `shape.channels()`
/// - [`QuantclassError::ResamplingFailed`] if the resampled surface cannot be
///   produced at the requested size
pub fn preprocess(
    image: &DynamicImage,
    shape: &TensorShape,
) -> Result<InputTensorBytes, QuantclassError> {
    preprocess_with(image, shape, &PreprocessOptions::default())
}

/// Converts `image` into an input tensor of `shape`.
pub fn preprocess_with(
    image: &DynamicImage,
    shape: &TensorShape,
    opts: &PreprocessOptions,
) -> Result<InputTensorBytes, QuantclassError> {
    let (src_width, src_height) = (image.width(), image.height());
    if src_width == 0 || src_height == 0 {
        return Err(QuantclassError::EmptyImage {
            width: src_width,
            height: src_height,
        });
    }

    let color = image.color();
    if usize::from(color.channel_count()) < shape.channels() {
        return Err(QuantclassError::UnsupportedFormat(format!(
            "{:?} source has {} color component(s), target needs {}",
            color,
            color.channel_count(),
            shape.channels()
        )));
    }

    let resampled = resample(&image.to_rgb8(), shape, opts.filter)?;
    let data = pack_rgb(&resampled, shape);

    debug!(
        "preprocessed {}x{} {:?} image into {} ({} bytes, filter {:?})",
        src_width,
        src_height,
        color,
        shape,
        data.len(),
        opts.filter
    );

    InputTensorBytes::from_vec(*shape, data).ok_or_else(|| {
        QuantclassError::ResamplingFailed(format!("packed buffer does not match shape {}", shape))
    })
}

/// Scales `rgb` to exactly the target width and height.
fn resample(
    rgb: &RgbImage,
    shape: &TensorShape,
    filter: ResizeFilter,
) -> Result<RgbImage, QuantclassError> {
    let target_width = u32::try_from(shape.width()).map_err(|_| {
        QuantclassError::ResamplingFailed(format!(
            "target width {} exceeds image surface limits",
            shape.width()
        ))
    })?;
    let target_height = u32::try_from(shape.height()).map_err(|_| {
        QuantclassError::ResamplingFailed(format!(
            "target height {} exceeds image surface limits",
            shape.height()
        ))
    })?;

    if rgb.dimensions() == (target_width, target_height) {
        return Ok(rgb.clone());
    }

    reserve_surface(rgb.width(), target_width, target_height)?;

    let resized = imageops::resize(rgb, target_width, target_height, filter.into());
    if resized.dimensions() != (target_width, target_height) {
        return Err(QuantclassError::ResamplingFailed(format!(
            "expected {}x{} surface, got {}x{}",
            target_width,
            target_height,
            resized.width(),
            resized.height()
        )));
    }

    Ok(resized)
}

/// Fails with `ResamplingFailed` unless the buffers `imageops::resize` will
/// allocate for this target can actually be obtained.
fn reserve_surface(
    src_width: u32,
    target_width: u32,
    target_height: u32,
) -> Result<(), QuantclassError> {
    let target_pixels = u64::from(target_width) * u64::from(target_height);
    if target_pixels > MAX_TARGET_PIXELS {
        return Err(QuantclassError::ResamplingFailed(format!(
            "target surface {}x{} exceeds the {} pixel limit",
            target_width, target_height, MAX_TARGET_PIXELS
        )));
    }

    // Vertical pass output (source width x target height) plus the final RGB surface.
    let intermediate = u64::from(src_width) * u64::from(target_height);
    let bytes = intermediate
        .checked_mul(RESIZE_INTERMEDIATE_BYTES_PER_PIXEL)
        .and_then(|b| b.checked_add(target_pixels * 3))
        .and_then(|b| usize::try_from(b).ok())
        .ok_or_else(|| {
            QuantclassError::ResamplingFailed(format!(
                "{}x{} surface does not fit in memory",
                target_width, target_height
            ))
        })?;

    Vec::<u8>::new().try_reserve_exact(bytes).map_err(|e| {
        QuantclassError::ResamplingFailed(format!(
            "cannot allocate {} bytes for a {}x{} surface: {}",
            bytes, target_width, target_height, e
        ))
    })
}

/// Packs a resampled image into a row-major, channel-interleaved buffer.
///
/// Reading walks the resampled pixels in order; the write offset is derived
/// only from the pixel's own coordinates, so one pixel's channels can never
/// spill into the next pixel's slot.
fn pack_rgb(resampled: &RgbImage, shape: &TensorShape) -> Vec<u8> {
    let width = shape.width();
    let channels = shape.channels();
    let mut out = vec![0u8; shape.element_count()];

    for (col, row, pixel) in resampled.enumerate_pixels() {
        let pixel_index = row as usize * width + col as usize;
        let offset = pixel_index * channels;
        out[offset..offset + channels].copy_from_slice(&pixel.0[..channels]);
    }

    out
}

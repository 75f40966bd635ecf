//! Tensor shape and element type descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QuantclassError;

/// Number of color channels packed per pixel (R, G, B).
pub const RGB_CHANNELS: usize = 3;

/// The shape of a single-image NHWC input tensor.
///
/// Stored as `(batch, height, width, channels)`. Construction enforces
/// `batch == 1` and `channels == 3`; only single-image RGB inference is
/// supported.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 4]", into = "[usize; 4]")]
pub struct TensorShape {
    batch: usize,
    height: usize,
    width: usize,
    channels: usize,
}

impl TensorShape {
    /// Creates a validated shape.
    pub fn new(
        batch: usize,
        height: usize,
        width: usize,
        channels: usize,
    ) -> Result<Self, QuantclassError> {
        let dims = [batch, height, width, channels];
        let invalid = |message: &str| QuantclassError::InvalidShape {
            shape: dims,
            message: message.to_string(),
        };

        if dims.contains(&0) {
            return Err(invalid("all dimensions must be positive"));
        }
        if batch != 1 {
            return Err(invalid("batch size must be 1"));
        }
        if channels != RGB_CHANNELS {
            return Err(invalid("channel count must be 3 (RGB)"));
        }
        if dims
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .is_none()
        {
            return Err(invalid("element count overflows usize"));
        }

        Ok(Self {
            batch,
            height,
            width,
            channels,
        })
    }

    /// Creates an RGB shape with batch size 1.
    pub fn rgb(height: usize, width: usize) -> Result<Self, QuantclassError> {
        Self::new(1, height, width, RGB_CHANNELS)
    }

    #[inline]
    pub fn batch(&self) -> usize {
        self.batch
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of pixels in one image plane.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }

    /// Total number of elements (`batch * height * width * channels`).
    #[inline]
    pub fn element_count(&self) -> usize {
        self.batch * self.height * self.width * self.channels
    }

    /// Returns the dimensions as an array.
    pub fn dims(&self) -> [usize; 4] {
        [self.batch, self.height, self.width, self.channels]
    }
}

impl Default for TensorShape {
    /// The 224x224 RGB shape used by the reference MobileNet model.
    fn default() -> Self {
        Self {
            batch: 1,
            height: 224,
            width: 224,
            channels: RGB_CHANNELS,
        }
    }
}

impl TryFrom<[usize; 4]> for TensorShape {
    type Error = QuantclassError;

    fn try_from(dims: [usize; 4]) -> Result<Self, Self::Error> {
        Self::new(dims[0], dims[1], dims[2], dims[3])
    }
}

impl From<TensorShape> for [usize; 4] {
    fn from(shape: TensorShape) -> Self {
        shape.dims()
    }
}

impl fmt::Debug for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TensorShape({:?})", self.dims())
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.batch, self.height, self.width, self.channels
        )
    }
}

/// Element type of a tensor.
///
/// Only unsigned 8-bit quantized tensors (scale 1/255) are supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    #[default]
    Uint8,
}

impl ElementType {
    /// Parses an element type name (`uint8` / `u8`).
    pub fn parse(name: &str) -> Result<Self, QuantclassError> {
        match name.to_ascii_lowercase().as_str() {
            "uint8" | "u8" => Ok(ElementType::Uint8),
            other => Err(QuantclassError::UnsupportedElementType(other.to_string())),
        }
    }

    /// Converts a stored value to its real value (`value / 255`).
    pub fn dequantize(&self, value: u8) -> f32 {
        match self {
            ElementType::Uint8 => f32::from(value) / 255.0,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Uint8 => write!(f, "uint8"),
        }
    }
}

/// Shape plus element type of a model input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorDescriptor {
    #[serde(default)]
    pub element_type: ElementType,
    pub shape: TensorShape,
}

/// Element type and class count of a classifier output (`[1, classes]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    #[serde(default)]
    pub element_type: ElementType,
    pub classes: usize,
}

/// Input and output format handed to an inference engine alongside the input
/// bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IoFormat {
    pub input: TensorDescriptor,
    pub output: OutputDescriptor,
}

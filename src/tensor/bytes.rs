//! Owned quantized tensor buffers.
//!
//! Both buffers are newtypes over `Vec<u8>` so that an input tensor can never
//! be passed where scores are expected (and vice versa).

use std::fmt;

use super::shape::TensorShape;

/// A packed NHWC `u8` input tensor, exactly `shape.element_count()` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct InputTensorBytes {
    shape: TensorShape,
    data: Vec<u8>,
}

impl InputTensorBytes {
    /// Wraps an already packed buffer.
    ///
    /// Returns `None` if the length does not match the shape.
    pub fn from_vec(shape: TensorShape, data: Vec<u8>) -> Option<Self> {
        (data.len() == shape.element_count()).then_some(Self { shape, data })
    }

    /// The shape this buffer was packed for.
    #[inline]
    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the RGB triple at `(row, col)`, if in bounds.
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        if row >= self.shape.height() || col >= self.shape.width() {
            return None;
        }
        let base = (row * self.shape.width() + col) * self.shape.channels();
        Some([self.data[base], self.data[base + 1], self.data[base + 2]])
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for InputTensorBytes {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for InputTensorBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputTensorBytes")
            .field("shape", &self.shape)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Raw classifier output: one quantized confidence per class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputTensorBytes(Vec<u8>);

impl OutputTensorBytes {
    #[inline]
    pub fn new(scores: Vec<u8>) -> Self {
        Self(scores)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of classes scored.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for OutputTensorBytes {
    fn from(scores: Vec<u8>) -> Self {
        Self(scores)
    }
}

impl From<&[u8]> for OutputTensorBytes {
    fn from(scores: &[u8]) -> Self {
        Self(scores.to_vec())
    }
}

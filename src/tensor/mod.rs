//! Tensor contracts shared by preprocessing, ranking and inference engines.
//!
//! The model's input is a single NHWC `u8` image tensor and its output is one
//! quantized confidence per class. These types make that contract explicit
//! instead of passing untyped byte slices around.

mod bytes;
mod shape;

pub use bytes::{InputTensorBytes, OutputTensorBytes};
pub use shape::{
    ElementType, IoFormat, OutputDescriptor, TensorDescriptor, TensorShape, RGB_CHANNELS,
};

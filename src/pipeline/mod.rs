//! End-to-end classification: preprocess, run an external engine, rank.
//!
//! The inference engine is not part of this crate. Anything that can turn an
//! [`InputTensorBytes`] into an [`OutputTensorBytes`] implements
//! [`InferenceEngine`]; its errors are carried through untouched as
//! [`QuantclassError::InferenceFailed`].

mod sequencer;

pub use sequencer::{RequestSequencer, RequestTicket};

use image::DynamicImage;
use log::{debug, info};

use crate::error::{InferenceError, QuantclassError};
use crate::labels::LabelList;
use crate::model::ModelDescriptor;
use crate::preprocess::{preprocess_with, PreprocessOptions};
use crate::rank::{rank, RankedLabels};
use crate::tensor::{InputTensorBytes, IoFormat, OutputTensorBytes};

/// An external model runtime: one quantized input tensor in, scores out.
pub trait InferenceEngine {
    fn run(
        &self,
        input: &InputTensorBytes,
        io: &IoFormat,
    ) -> Result<OutputTensorBytes, InferenceError>;
}

impl<F> InferenceEngine for F
where
    F: Fn(&InputTensorBytes, &IoFormat) -> Result<OutputTensorBytes, InferenceError>,
{
    fn run(
        &self,
        input: &InputTensorBytes,
        io: &IoFormat,
    ) -> Result<OutputTensorBytes, InferenceError> {
        self(input, io)
    }
}

/// A model descriptor paired with its label list, checked once at startup.
#[derive(Clone, Debug)]
pub struct Classifier {
    descriptor: ModelDescriptor,
    labels: LabelList,
    preprocess: PreprocessOptions,
}

impl Classifier {
    /// Pairs `descriptor` with `labels`.
    ///
    /// # Errors
    /// Returns [`QuantclassError::LabelCountMismatch`] if the label count
    /// differs from the descriptor's output class count.
    pub fn new(descriptor: ModelDescriptor, labels: LabelList) -> Result<Self, QuantclassError> {
        if labels.len() != descriptor.output.classes {
            return Err(QuantclassError::LabelCountMismatch {
                scores: descriptor.output.classes,
                labels: labels.len(),
            });
        }

        info!(
            "classifier '{}' ready: input {}, {} classes",
            descriptor.name, descriptor.input.shape, descriptor.output.classes
        );

        Ok(Self {
            descriptor,
            labels,
            preprocess: PreprocessOptions::default(),
        })
    }

    /// Overrides the preprocessing options.
    pub fn with_preprocess_options(mut self, opts: PreprocessOptions) -> Self {
        self.preprocess = opts;
        self
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn labels(&self) -> &LabelList {
        &self.labels
    }

    /// Preprocesses `image` for this model.
    pub fn prepare(&self, image: &DynamicImage) -> Result<InputTensorBytes, QuantclassError> {
        preprocess_with(image, &self.descriptor.input.shape, &self.preprocess)
    }

    /// Ranks raw engine output against this model's labels.
    pub fn interpret(
        &self,
        scores: &OutputTensorBytes,
        top_k: usize,
    ) -> Result<RankedLabels, QuantclassError> {
        rank(scores, &self.labels, top_k)
    }

    /// Classifies `image` with `engine`, keeping the best `top_k` labels.
    pub fn classify<E: InferenceEngine + ?Sized>(
        &self,
        image: &DynamicImage,
        engine: &E,
        top_k: usize,
    ) -> Result<RankedLabels, QuantclassError> {
        let input = self.prepare(image)?;
        let scores = engine
            .run(&input, &self.descriptor.io_format())
            .map_err(QuantclassError::InferenceFailed)?;
        debug!("engine returned {} score(s)", scores.len());
        self.interpret(&scores, top_k)
    }

    /// Like [`classify`](Self::classify) with the descriptor's default top-K.
    pub fn classify_default<E: InferenceEngine + ?Sized>(
        &self,
        image: &DynamicImage,
        engine: &E,
    ) -> Result<RankedLabels, QuantclassError> {
        self.classify(image, engine, self.descriptor.top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::cell::Cell;

    fn tiny_descriptor(classes: usize) -> ModelDescriptor {
        let mut desc = ModelDescriptor::mobilenet_v1_224_quant(classes);
        desc.input.shape = crate::tensor::TensorShape::rgb(4, 4).unwrap();
        desc
    }

    fn labels() -> LabelList {
        ["red", "green", "blue"].into_iter().collect()
    }

    /// Scores each class by the mean of its channel.
    fn channel_means(
        input: &InputTensorBytes,
        io: &IoFormat,
    ) -> Result<OutputTensorBytes, InferenceError> {
        assert_eq!(input.shape(), io.input.shape);
        let pixels = input.shape().pixel_count();
        let mut sums = [0usize; 3];
        for px in input.as_bytes().chunks(3) {
            for (sum, value) in sums.iter_mut().zip(px) {
                *sum += usize::from(*value);
            }
        }
        Ok(sums.iter().map(|s| (s / pixels) as u8).collect::<Vec<_>>().into())
    }

    #[test]
    fn test_classify_end_to_end() {
        let classifier = Classifier::new(tiny_descriptor(3), labels()).unwrap();
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([10, 200, 90])));

        let ranked = classifier.classify(&image, &channel_means, 2).unwrap();
        let names: Vec<&str> = ranked.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(names, vec!["green", "blue"]);
    }

    #[test]
    fn test_classify_default_uses_descriptor_top_k() {
        let mut desc = tiny_descriptor(3);
        desc.top_k = 1;
        let classifier = Classifier::new(desc, labels()).unwrap();
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([250, 0, 0])));

        let ranked = classifier.classify_default(&image, &channel_means).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.best().unwrap().label, "red");
    }

    #[test]
    fn test_new_rejects_label_mismatch() {
        let err = Classifier::new(tiny_descriptor(4), labels()).unwrap_err();
        assert!(matches!(
            err,
            QuantclassError::LabelCountMismatch {
                scores: 4,
                labels: 3
            }
        ));
    }

    #[test]
    fn test_engine_error_is_propagated() {
        let classifier = Classifier::new(tiny_descriptor(3), labels()).unwrap();
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let failing = |_: &InputTensorBytes, _: &IoFormat| -> Result<OutputTensorBytes, InferenceError> {
            Err("model not downloaded".into())
        };

        let err = classifier.classify(&image, &failing, 3).unwrap_err();
        assert!(matches!(err, QuantclassError::InferenceFailed(_)));
        assert!(err.to_string().contains("model not downloaded"));
    }

    #[test]
    fn test_wrong_output_length_is_mismatch() {
        let classifier = Classifier::new(tiny_descriptor(3), labels()).unwrap();
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let short = |_: &InputTensorBytes, _: &IoFormat| -> Result<OutputTensorBytes, InferenceError> {
            Ok(vec![1, 2].into())
        };

        let err = classifier.classify(&image, &short, 3).unwrap_err();
        assert!(matches!(err, QuantclassError::LabelCountMismatch { .. }));
    }

    #[test]
    fn test_preprocess_failure_skips_engine() {
        let classifier = Classifier::new(tiny_descriptor(3), labels()).unwrap();
        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(4, 4));
        let calls = Cell::new(0);
        let counting = |input: &InputTensorBytes, io: &IoFormat| {
            calls.set(calls.get() + 1);
            channel_means(input, io)
        };

        let err = classifier.classify(&gray, &counting, 3).unwrap_err();
        assert!(matches!(err, QuantclassError::UnsupportedFormat(_)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_preprocess_options_reach_prepare() {
        let checker = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }));
        let is_extreme = |b: &u8| *b == 0 || *b == 255;

        let smooth = Classifier::new(tiny_descriptor(3), labels()).unwrap();
        let blended = smooth.prepare(&checker).unwrap().into_vec();
        assert!(!blended.iter().all(is_extreme));

        let nearest = Classifier::new(tiny_descriptor(3), labels())
            .unwrap()
            .with_preprocess_options(PreprocessOptions {
                filter: crate::preprocess::ResizeFilter::Nearest,
            });
        assert_eq!(nearest.descriptor().input.shape.dims(), [1, 4, 4, 3]);
        assert_eq!(nearest.labels().get(2), Some("blue"));

        let sharp = nearest.prepare(&checker).unwrap().into_vec();
        assert_eq!(sharp.len(), 4 * 4 * 3);
        assert!(sharp.iter().all(is_extreme));
    }

    #[test]
    fn test_struct_engine() {
        struct Fixed(Vec<u8>);

        impl InferenceEngine for Fixed {
            fn run(
                &self,
                _input: &InputTensorBytes,
                _io: &IoFormat,
            ) -> Result<OutputTensorBytes, InferenceError> {
                Ok(OutputTensorBytes::new(self.0.clone()))
            }
        }

        let classifier = Classifier::new(tiny_descriptor(3), labels()).unwrap();
        let image = DynamicImage::ImageRgb8(RgbImage::new(9, 9));
        let engine: Box<dyn InferenceEngine> = Box::new(Fixed(vec![0, 0, 255]));
        let ranked = classifier.classify(&image, engine.as_ref(), 1).unwrap();
        assert_eq!(ranked.best().unwrap().label, "blue");
    }
}

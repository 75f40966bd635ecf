//! Model descriptors.
//!
//! A descriptor names a quantized classifier and fixes its tensor contract:
//! the input image shape and the number of output classes. Descriptors are
//! loaded once at startup from JSON or YAML and treated as immutable.
//!
//! ```yaml
//! name: mobilenet_v1_224_quant
//! local_model: mobilenet_v1_1.0_224_quant.tflite
//! hosted_model: mobilenet_v1_224_quant
//! input:
//!   element_type: uint8
//!   shape: [1, 224, 224, 3]
//! output:
//!   element_type: uint8
//!   classes: 1001
//! labels: labels.txt
//! top_k: 3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::QuantclassError;
use crate::tensor::{ElementType, IoFormat, OutputDescriptor, TensorDescriptor};

/// Number of labels shown when neither the descriptor nor the caller says.
pub const DEFAULT_TOP_K: usize = 3;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Describes a quantized image classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name.
    pub name: String,

    /// Bundled model file, passed through to the inference runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_model: Option<String>,

    /// Hosted model name, passed through to the inference runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_model: Option<String>,

    /// Input image tensor.
    #[serde(default)]
    pub input: TensorDescriptor,

    /// Output score tensor.
    pub output: OutputDescriptor,

    /// Label file, relative to the descriptor file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<PathBuf>,

    /// Default number of ranked labels to report.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl ModelDescriptor {
    /// Descriptor for the quantized MobileNet v1 224x224 reference model.
    pub fn mobilenet_v1_224_quant(classes: usize) -> Self {
        Self {
            name: "mobilenet_v1_224_quant".to_string(),
            local_model: Some("mobilenet_v1_1.0_224_quant.tflite".to_string()),
            hosted_model: Some("mobilenet_v1_224_quant".to_string()),
            input: TensorDescriptor::default(),
            output: OutputDescriptor {
                element_type: ElementType::Uint8,
                classes,
            },
            labels: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Reads a descriptor, choosing YAML for `.yaml`/`.yml` and JSON
    /// otherwise.
    ///
    /// A relative `labels` path is resolved against the descriptor's
    /// directory.
    pub fn read(path: &Path) -> Result<Self, QuantclassError> {
        let text = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let parsed = if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        };
        let mut descriptor = parsed.map_err(|message| QuantclassError::DescriptorParse {
            path: path.to_path_buf(),
            message,
        })?;

        if let (Some(labels), Some(parent)) = (descriptor.labels.take(), path.parent()) {
            descriptor.labels = Some(if labels.is_relative() {
                parent.join(labels)
            } else {
                labels
            });
        }

        Ok(descriptor)
    }

    /// Parses a JSON descriptor.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    /// Parses a YAML descriptor.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    /// The format handed to an inference engine with each request.
    pub fn io_format(&self) -> IoFormat {
        IoFormat {
            input: self.input,
            output: self.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::TensorShape;

    #[test]
    fn test_yaml_descriptor() {
        let yaml = r#"
name: tiny
input:
  element_type: uint8
  shape: [1, 32, 48, 3]
output:
  classes: 10
top_k: 5
"#;
        let desc = ModelDescriptor::from_yaml_str(yaml).unwrap();
        assert_eq!(desc.name, "tiny");
        assert_eq!(desc.input.shape, TensorShape::rgb(32, 48).unwrap());
        assert_eq!(desc.output.classes, 10);
        assert_eq!(desc.output.element_type, ElementType::Uint8);
        assert_eq!(desc.top_k, 5);
        assert!(desc.labels.is_none());
    }

    #[test]
    fn test_json_defaults() {
        let desc = ModelDescriptor::from_json_str(r#"{"name":"m","output":{"classes":4}}"#)
            .unwrap();
        assert_eq!(desc.input.shape, TensorShape::default());
        assert_eq!(desc.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_invalid_shape_rejected() {
        let json = r#"{"name":"m","input":{"shape":[2,224,224,3]},"output":{"classes":4}}"#;
        let err = ModelDescriptor::from_json_str(json).unwrap_err();
        assert!(err.contains("batch size must be 1"), "{}", err);
    }

    #[test]
    fn test_unknown_element_type_rejected() {
        let json = r#"{"name":"m","output":{"classes":4,"element_type":"float32"}}"#;
        assert!(ModelDescriptor::from_json_str(json).is_err());
    }

    #[test]
    fn test_read_resolves_relative_labels() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("model.yml");
        fs::write(
            &path,
            "name: m\noutput:\n  classes: 2\nlabels: labels.txt\n",
        )
        .unwrap();

        let desc = ModelDescriptor::read(&path).unwrap();
        assert_eq!(desc.labels, Some(temp.path().join("labels.txt")));
    }

    #[test]
    fn test_read_reports_parse_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("model.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ModelDescriptor::read(&path).unwrap_err();
        assert!(matches!(err, QuantclassError::DescriptorParse { .. }));
    }

    #[test]
    fn test_reference_descriptor_roundtrips() {
        let desc = ModelDescriptor::mobilenet_v1_224_quant(1001);
        let json = serde_json::to_string(&desc).unwrap();
        let restored = ModelDescriptor::from_json_str(&json).unwrap();
        assert_eq!(restored, desc);
        assert_eq!(restored.io_format().input.shape.dims(), [1, 224, 224, 3]);
    }
}

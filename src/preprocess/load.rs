//! Image file loading helpers for the CLI and batch preprocessing.

use std::io;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use walkdir::WalkDir;

use crate::error::QuantclassError;

/// File extensions treated as images when walking a directory.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "png", "jpeg", "bmp", "webp"];

/// Decodes an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage, QuantclassError> {
    image::open(path).map_err(|source| QuantclassError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `(width, height)` from an image header without decoding pixels.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), QuantclassError> {
    let size = imagesize::size(path).map_err(|source| QuantclassError::ImageProbe {
        path: path.to_path_buf(),
        source,
    })?;

    let width = u32::try_from(size.width).map_err(|_| {
        QuantclassError::UnsupportedFormat(format!(
            "{}: width {} does not fit in u32",
            path.display(),
            size.width
        ))
    })?;
    let height = u32::try_from(size.height).map_err(|_| {
        QuantclassError::UnsupportedFormat(format!(
            "{}: height {} does not fit in u32",
            path.display(),
            size.height
        ))
    })?;

    Ok((width, height))
}

/// Recursively collects image files under `root`, sorted by path.
pub fn collect_image_files(root: &Path) -> Result<Vec<PathBuf>, QuantclassError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;

        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

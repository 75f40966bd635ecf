#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use quantclass::LabelList;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_rgb() -> impl Strategy<Value = [u8; 3]> {
    any::<[u8; 3]>()
}

/// Image dimensions kept small so resampling stays fast.
pub fn arb_dims() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=64, 1u32..=64)
}

pub fn arb_target() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=48, 1usize..=48)
}

/// A solid-color image, either RGB or RGBA with a random alpha.
pub fn arb_solid_image() -> impl Strategy<Value = (DynamicImage, [u8; 3])> {
    (arb_dims(), arb_rgb(), proptest::option::of(any::<u8>())).prop_map(
        |((w, h), [r, g, b], alpha)| {
            let image = match alpha {
                Some(a) => DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([r, g, b, a]))),
                None => DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([r, g, b]))),
            };
            (image, [r, g, b])
        },
    )
}

/// An RGB image with arbitrary pixel contents.
pub fn arb_noise_image() -> impl Strategy<Value = RgbImage> {
    arb_dims().prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<u8>(), (w * h * 3) as usize).prop_map(move |raw| {
            RgbImage::from_raw(w, h, raw).expect("buffer sized for dimensions")
        })
    })
}

/// Scores plus an index-aligned label list of the same length.
pub fn arb_scores_and_labels(max_classes: usize) -> impl Strategy<Value = (Vec<u8>, LabelList)> {
    proptest::collection::vec(any::<u8>(), 0..=max_classes).prop_map(|scores| {
        let labels: LabelList = (0..scores.len()).map(|i| format!("class_{i}")).collect();
        (scores, labels)
    })
}

//! Pretrained accuracy checks against the downloaded fixture.
//!
//! These need network access and the checkpoints in `WEIGHTS_DIR`, run them with
//! `cargo test --test accuracy -- --ignored`.

use inception_check::{
    CpuBackend, Fixture, GoogleDrive, ModelVariant,
    common::{ACCURACY_THRESHOLD, BATCH_SIZE, NUM_CLASSES},
    evaluate,
    model::inference::check_output_shape,
    utils::{app_paths::AppPaths, logging::install_logger},
};
use std::path::PathBuf;

fn fixture_images(paths: &AppPaths) -> PathBuf {
    Fixture::new(&paths.fixture_root, &paths.fixture_id)
        .ensure(&GoogleDrive::new().unwrap())
        .unwrap()
}

fn assert_accurate(variant: ModelVariant) {
    install_logger();
    let paths = AppPaths::from_env();
    let images = fixture_images(&paths);
    let device = Default::default();

    let model = variant
        .load::<CpuBackend>(true, &paths.weights_dir, NUM_CLASSES, &device)
        .unwrap();
    check_output_shape::<CpuBackend, _>(&model, BATCH_SIZE, NUM_CLASSES, &device).unwrap();
    let summary = evaluate::<CpuBackend, _>(&model, &images, &device).unwrap();

    assert!(
        summary.passes(ACCURACY_THRESHOLD),
        "{variant}: {}/{} correct",
        summary.correct,
        summary.total
    );
}

#[test]
#[ignore = "downloads the fixture and needs pretrained checkpoints"]
fn inception_v2_accuracy() {
    assert_accurate(ModelVariant::InceptionV2);
}

#[test]
#[ignore = "downloads the fixture and needs pretrained checkpoints"]
fn inception_v3_accuracy() {
    assert_accurate(ModelVariant::InceptionV3);
}

#[test]
#[ignore = "downloads the fixture and needs pretrained checkpoints"]
fn resnet18_accuracy() {
    assert_accurate(ModelVariant::ResNet18);
}

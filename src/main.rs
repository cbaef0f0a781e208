use burn::backend::ndarray::NdArrayDevice;
use color_eyre::{
    Result,
    eyre::{WrapErr, bail},
};
use inception_check::{
    CpuBackend, Fixture, GoogleDrive, ModelVariant, evaluate,
    model::inference::check_output_shape,
    utils::{app_paths::AppPaths, config::HarnessConfig, logging::install_logger},
};
use log::{info, warn};
use std::path::Path;

fn check_variant(
    variant: ModelVariant,
    paths: &AppPaths,
    config: &HarnessConfig,
    images_dir: &Path,
    device: &NdArrayDevice,
) -> Result<bool> {
    let model = variant
        .load::<CpuBackend>(true, &paths.weights_dir, config.num_classes, device)
        .wrap_err_with(|| format!("Failed to build pretrained {variant}"))?;

    check_output_shape::<CpuBackend, _>(&model, config.batch_size, config.num_classes, device)
        .wrap_err_with(|| format!("Shape check failed for {variant}"))?;

    let summary = evaluate::<CpuBackend, _>(&model, images_dir, device)
        .wrap_err_with(|| format!("Evaluation failed for {variant}"))?;
    let passed = summary.passes(config.accuracy_threshold);

    if passed {
        info!(
            "{variant}: {}/{} correct ({:.2}%)",
            summary.correct,
            summary.total,
            summary.accuracy()
        );
    } else {
        warn!(
            "{variant}: {}/{} correct ({:.2}%), needs more than {:.0}%",
            summary.correct,
            summary.total,
            summary.accuracy(),
            config.accuracy_threshold * 100.0
        );
    }
    Ok(passed)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    install_logger();

    let paths = AppPaths::from_env();
    let config = HarnessConfig::load_or_default(paths.config_path.as_deref())?;
    let device = NdArrayDevice::Cpu;

    let images_dir = Fixture::new(&paths.fixture_root, &paths.fixture_id)
        .ensure(&GoogleDrive::new()?)
        .wrap_err("Failed to prepare test images")?;

    let mut failed = Vec::new();
    for variant in ModelVariant::ALL {
        if !check_variant(variant, &paths, &config, &images_dir, &device)? {
            failed.push(variant.name());
        }
    }

    if !failed.is_empty() {
        bail!("Accuracy below threshold for: {}", failed.join(", "));
    }
    info!("All models passed.");
    Ok(())
}

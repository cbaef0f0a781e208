use crate::{
    data::{
        conversion::load_image_tensor,
        normalize::{NormalizeConfig, normalize},
        samples::load_samples,
    },
    model::{Classifier, inference::predict_label},
    utils::metrics::EvaluationSummary,
};
use burn::prelude::*;
use color_eyre::Result;
use log::debug;
use std::path::Path;

/// Scores `model` on every labeled image directly inside `dir`.
///
/// Each file is normalized and classified on its own; the predicted label is the
/// argmax plus one. Any unreadable image or malformed file name aborts the pass.
pub fn evaluate<B: Backend, M: Classifier<B> + ?Sized>(
    model: &M,
    dir: &Path,
    device: &Device<B>,
) -> Result<EvaluationSummary> {
    let normalize_config = NormalizeConfig::default();
    let mut summary = EvaluationSummary::default();

    for sample in load_samples(dir)? {
        let image = normalize(load_image_tensor::<B>(&sample.path, device)?, &normalize_config);
        let predicted = predict_label(model, image);
        debug!(
            "{:?}: predicted {predicted}, expected {}",
            sample.path, sample.label
        );
        summary.record(predicted == sample.label);
    }

    Ok(summary)
}

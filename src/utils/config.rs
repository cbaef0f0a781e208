use crate::common::{ACCURACY_THRESHOLD, BATCH_SIZE, NUM_CLASSES};

use burn::config::Config;
use color_eyre::{Result, eyre::WrapErr};
use std::path::Path;

#[derive(Config, Debug)]
pub struct HarnessConfig {
    /// Batch size of the all-ones shape probe.
    #[config(default = "BATCH_SIZE")]
    pub batch_size: usize,

    /// Number of classes the checkpoints were fine-tuned on.
    #[config(default = "NUM_CLASSES")]
    pub num_classes: usize,

    /// Minimum fraction of correct predictions, compared strictly.
    #[config(default = "ACCURACY_THRESHOLD")]
    pub accuracy_threshold: f64,
}

impl HarnessConfig {
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => HarnessConfig::load(path)
                .wrap_err_with(|| format!("Failed to load harness config {path:?}")),
            None => Ok(HarnessConfig::new()),
        }
    }
}

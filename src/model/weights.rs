use crate::model::Classifier;

use burn::{
    prelude::*,
    record::{FullPrecisionSettings, Recorder},
};
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use color_eyre::{
    Result,
    eyre::{WrapErr, bail},
};
use log::info;
use std::path::{Path, PathBuf};

/// Loads a PyTorch `state_dict` into `model`, renaming keys with `(pattern, replacement)` pairs.
pub fn load_pytorch_weights<B: Backend, M: Module<B>>(
    model: M,
    path: &Path,
    key_remaps: &[(String, String)],
    device: &Device<B>,
) -> Result<M> {
    if !path.exists() {
        bail!("Missing weights file: {path:?}. Expected a PyTorch checkpoint.");
    }

    let load_args = key_remaps
        .iter()
        .fold(LoadArgs::new(path.to_path_buf()), |args, (pattern, replacement)| {
            args.with_key_remap(pattern, replacement)
        });

    let record: M::Record = PyTorchFileRecorder::<FullPrecisionSettings>::default()
        .load(load_args, device)
        .wrap_err_with(|| format!("Failed to load / map PyTorch state {path:?} into Burn record"))?;

    info!("Loaded weights from {path:?}");
    Ok(model.load_record(record))
}

/// Boxes a freshly built model, loading the checkpoint first when one is given.
pub(crate) fn finish<B, M>(
    model: M,
    checkpoint: Option<(PathBuf, Vec<(String, String)>)>,
    device: &Device<B>,
) -> Result<Box<dyn Classifier<B>>>
where
    B: Backend,
    M: Module<B> + Classifier<B> + 'static,
{
    let model = match checkpoint {
        Some((path, remaps)) => load_pytorch_weights(model, &path, &remaps, device)?,
        None => model,
    };
    Ok(Box::new(model))
}

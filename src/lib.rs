pub mod common;
pub mod data;
pub mod fixture;
pub mod model;
pub mod utils;

pub use crate::{
    fixture::{Fixture, GoogleDrive, RemoteFetch},
    model::{Classifier, ModelVariant, valid::evaluate},
    utils::metrics::EvaluationSummary,
};

/// CPU inference backend used by the runner and the test suite.
pub type CpuBackend = burn::backend::NdArray<f32>;

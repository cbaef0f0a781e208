use crate::common::FIXTURE_FILE_ID;

use std::path::{Path, PathBuf};

/// Filesystem locations and remote identifiers, overridable from the environment.
#[derive(Clone, Debug)]
pub struct AppPaths {
    pub weights_dir: PathBuf,
    pub fixture_root: PathBuf,
    pub fixture_id: String,
    pub config_path: Option<PathBuf>,
}

impl Default for AppPaths {
    fn default() -> Self {
        Self {
            weights_dir: "weights".into(),
            fixture_root: default_fixture_root(),
            fixture_id: FIXTURE_FILE_ID.into(),
            config_path: None,
        }
    }
}

impl AppPaths {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            weights_dir: std::env::var_os("WEIGHTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.weights_dir),
            fixture_root: std::env::var_os("FIXTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.fixture_root),
            fixture_id: std::env::var("FIXTURE_ID").unwrap_or(defaults.fixture_id),
            config_path: std::env::var_os("HARNESS_CONFIG").map(PathBuf::from),
        }
    }
}

/// `tests/test_images` next to the integration tests of this crate.
pub fn default_fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test_images")
}

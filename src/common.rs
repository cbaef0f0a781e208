//! Fixed dimensions and thresholds of the harness.

pub const CHANNELS: usize = 3;
pub const HEIGHT: usize = 299;
pub const WIDTH: usize = 299;

pub const NUM_CLASSES: usize = 4;
pub const BATCH_SIZE: usize = 8;
pub const ACCURACY_THRESHOLD: f64 = 0.6;

/// Drive identifier of the labeled test image archive.
pub const FIXTURE_FILE_ID: &str = "1nILi82OjswYySH631dcLaHZyoVB4cNJS";
/// Folder inside the fixture archive that holds the samples.
pub const FIXTURE_IMAGES_DIR: &str = "test_images";

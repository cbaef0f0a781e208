use crate::common::{CHANNELS, HEIGHT, WIDTH};

use burn::{prelude::*, tensor::Tensor};
use color_eyre::{Result, eyre::WrapErr};
use image::{RgbImage, imageops::FilterType};
use std::path::Path;

/// Decodes an image file and resizes it to the fixed model resolution.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path).wrap_err_with(|| format!("Failed to read image {path:?}"))?;
    Ok(img
        .resize_exact(WIDTH as u32, HEIGHT as u32, FilterType::Triangle)
        .into_rgb8())
}

/// Converts an RGB image of the model resolution into a `[1, C, H, W]` tensor in `[0, 1]`.
pub fn convert_image_to_tensor<B: Backend>(img: &RgbImage, device: &B::Device) -> Tensor<B, 4> {
    assert_eq!(
        (img.width() as usize, img.height() as usize),
        (WIDTH, HEIGHT),
        "Unexpected image size"
    );

    let hw = HEIGHT * WIDTH;
    let mut buf = vec![0f32; CHANNELS * hw];
    for (x, y, pixel) in img.enumerate_pixels() {
        let idx = y as usize * WIDTH + x as usize;
        for (c, value) in pixel.0.iter().enumerate() {
            buf[c * hw + idx] = *value as f32 / 255.0;
        }
    }
    Tensor::<B, 3>::from_data(
        TensorData::new(buf, [CHANNELS, HEIGHT, WIDTH]).convert::<B::FloatElem>(),
        device,
    )
    .reshape([1, CHANNELS, HEIGHT, WIDTH])
}

/// Loads an image file as a model-ready (not yet normalized) tensor.
pub fn load_image_tensor<B: Backend>(path: &Path, device: &B::Device) -> Result<Tensor<B, 4>> {
    let img = load_rgb_image(path)?;
    Ok(convert_image_to_tensor(&img, device))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CpuBackend;
    use image::Rgb;

    #[test]
    fn any_input_size_becomes_model_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1_small.png");
        RgbImage::from_pixel(17, 5, Rgb([255, 0, 51])).save(&path).unwrap();

        let tensor = load_image_tensor::<CpuBackend>(&path, &Default::default()).unwrap();

        assert_eq!(tensor.dims(), [1, CHANNELS, HEIGHT, WIDTH]);
    }

    #[test]
    fn channels_are_planar_and_scaled() {
        let img = RgbImage::from_pixel(WIDTH as u32, HEIGHT as u32, Rgb([255, 0, 51]));

        let tensor = convert_image_to_tensor::<CpuBackend>(&img, &Default::default());
        let means = tensor
            .mean_dim(3)
            .mean_dim(2)
            .into_data()
            .to_vec::<f32>()
            .unwrap();

        assert!((means[0] - 1.0).abs() < 1e-6);
        assert!(means[1].abs() < 1e-6);
        assert!((means[2] - 0.2).abs() < 1e-4);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1_broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let err = load_image_tensor::<CpuBackend>(&path, &Default::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read image"));
    }
}

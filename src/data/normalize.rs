use burn::{prelude::*, tensor::Tensor};

/// Per-channel statistics applied before inference.
#[derive(Clone, Debug)]
pub struct NormalizeConfig {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

fn channel_stats<B: Backend>(values: [f32; 3], device: &B::Device) -> Tensor<B, 4> {
    Tensor::from_data(
        TensorData::new(values.to_vec(), [1, 3, 1, 1]).convert::<B::FloatElem>(),
        device,
    )
}

/// Standardizes an NCHW image batch channel by channel: `(x - mean) / std`.
pub fn normalize<B: Backend>(tensor: Tensor<B, 4>, config: &NormalizeConfig) -> Tensor<B, 4> {
    let device = tensor.device();
    let mean = channel_stats::<B>(config.mean, &device);
    let std = channel_stats::<B>(config.std, &device);

    (tensor - mean) / std
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CpuBackend;

    #[test]
    fn mean_image_normalizes_to_zero() {
        let device = Default::default();
        let config = NormalizeConfig::default();
        let channels: Vec<Tensor<CpuBackend, 4>> = config
            .mean
            .iter()
            .map(|m| Tensor::full([2, 1, 4, 4], *m, &device))
            .collect();
        let image = Tensor::cat(channels, 1);

        let out = normalize(image, &config);

        assert_eq!(out.dims(), [2, 3, 4, 4]);
        let max = out.abs().max().into_scalar();
        assert!(max < 1e-5, "expected zeros, got max {max}");
    }

    #[test]
    fn scales_by_channel_std() {
        let device = Default::default();
        let config = NormalizeConfig {
            mean: [0.0, 0.0, 0.0],
            std: [0.5, 0.25, 2.0],
        };
        let image = Tensor::<CpuBackend, 4>::ones([1, 3, 1, 1], &device);

        let out = normalize(image, &config).into_data().to_vec::<f32>().unwrap();

        assert_eq!(out, vec![2.0, 4.0, 0.5]);
    }
}

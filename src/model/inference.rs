use crate::{
    common::{CHANNELS, HEIGHT, WIDTH},
    model::Classifier,
};
use burn::{
    prelude::*,
    tensor::{Tensor, cast::ToElement},
};
use color_eyre::{Result, eyre::bail};

/// Zero-based index of the highest score for a single image.
pub fn predict_class<B: Backend, M: Classifier<B> + ?Sized>(
    model: &M,
    image: Tensor<B, 4>,
) -> usize {
    let raw_output = model.infer(image);
    let (_score, idx) = raw_output.max_dim_with_indices(1);
    idx.into_scalar().to_usize()
}

/// One-based label, the convention used by the sample file names.
pub fn predict_label<B: Backend, M: Classifier<B> + ?Sized>(
    model: &M,
    image: Tensor<B, 4>,
) -> usize {
    predict_class(model, image) + 1
}

/// Runs an all-ones batch through `model` and checks the output is `[batch_size, num_classes]`.
pub fn check_output_shape<B: Backend, M: Classifier<B> + ?Sized>(
    model: &M,
    batch_size: usize,
    num_classes: usize,
    device: &Device<B>,
) -> Result<()> {
    let images = Tensor::<B, 4>::ones([batch_size, CHANNELS, HEIGHT, WIDTH], device);
    let dims = model.infer(images).dims();
    if dims != [batch_size, num_classes] {
        bail!("Unexpected output shape: {dims:?} != {:?}", [batch_size, num_classes]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CpuBackend;

    /// Scores ignore the input and peak at `class` for every image.
    struct Constant {
        class: usize,
        num_classes: usize,
    }

    impl<B: Backend> Classifier<B> for Constant {
        fn infer(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
            let [batch, ..] = images.dims();
            let mut scores = vec![0f32; batch * self.num_classes];
            for row in 0..batch {
                scores[row * self.num_classes + self.class] = 1.0;
            }
            Tensor::from_data(
                TensorData::new(scores, [batch, self.num_classes]).convert::<B::FloatElem>(),
                &images.device(),
            )
        }
    }

    #[test]
    fn label_is_class_plus_one() {
        let device = Default::default();
        let model = Constant {
            class: 2,
            num_classes: 4,
        };
        let image = Tensor::<CpuBackend, 4>::zeros([1, 3, 2, 2], &device);

        assert_eq!(predict_class(&model, image.clone()), 2);
        assert_eq!(predict_label(&model, image), 3);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let device = Default::default();
        let model = Constant {
            class: 0,
            num_classes: 3,
        };

        assert!(check_output_shape::<CpuBackend, _>(&model, 2, 3, &device).is_ok());
        let err = check_output_shape::<CpuBackend, _>(&model, 2, 4, &device).unwrap_err();
        assert!(err.to_string().contains("Unexpected output shape"));
    }
}

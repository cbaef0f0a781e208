pub mod blocks;
pub mod inception_v2;
pub mod inception_v3;
pub mod inference;
pub mod mobilenet_v2;
pub mod resnet;
pub mod valid;
pub mod weights;

use burn::prelude::*;
use color_eyre::Result;
use std::{fmt, path::Path};

use self::{
    inception_v2::InceptionV2, inception_v3::InceptionV3, mobilenet_v2::MobileNetV2,
    resnet::ResNet,
};

/// Anything that maps an image batch `[N, 3, H, W]` to class scores `[N, num_classes]`.
pub trait Classifier<B: Backend> {
    fn infer(&self, images: Tensor<B, 4>) -> Tensor<B, 2>;
}

impl<B: Backend, C: Classifier<B> + ?Sized> Classifier<B> for Box<C> {
    fn infer(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        (**self).infer(images)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelVariant {
    InceptionV2,
    InceptionV3,
    MobileNetV2,
    ResNet18,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 4] = [
        ModelVariant::InceptionV2,
        ModelVariant::InceptionV3,
        ModelVariant::MobileNetV2,
        ModelVariant::ResNet18,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::InceptionV2 => "inception_v2",
            ModelVariant::InceptionV3 => "inception_v3",
            ModelVariant::MobileNetV2 => "mobilenet_v2",
            ModelVariant::ResNet18 => "resnet18",
        }
    }

    /// PyTorch checkpoint expected in the weights directory.
    pub fn weights_file_name(&self) -> String {
        format!("{}.pth", self.name())
    }

    fn pytorch_key_remaps(&self) -> Vec<(String, String)> {
        match self {
            ModelVariant::InceptionV2 => inception_v2::pytorch_key_remaps(),
            ModelVariant::InceptionV3 => inception_v3::pytorch_key_remaps(),
            ModelVariant::MobileNetV2 => mobilenet_v2::pytorch_key_remaps(),
            ModelVariant::ResNet18 => resnet::pytorch_key_remaps(),
        }
    }

    /// Builds the variant, with freshly initialized parameters unless `pretrained`,
    /// in which case `<weights_dir>/<name>.pth` is loaded on top.
    pub fn load<B: Backend>(
        &self,
        pretrained: bool,
        weights_dir: &Path,
        num_classes: usize,
        device: &Device<B>,
    ) -> Result<Box<dyn Classifier<B>>> {
        let checkpoint = pretrained.then(|| {
            (
                weights_dir.join(self.weights_file_name()),
                self.pytorch_key_remaps(),
            )
        });

        match self {
            ModelVariant::InceptionV2 => {
                weights::finish(InceptionV2::new(num_classes, device), checkpoint, device)
            }
            ModelVariant::InceptionV3 => {
                weights::finish(InceptionV3::new(num_classes, device), checkpoint, device)
            }
            ModelVariant::MobileNetV2 => {
                weights::finish(MobileNetV2::new(num_classes, device), checkpoint, device)
            }
            ModelVariant::ResNet18 => {
                weights::finish(ResNet::resnet18(num_classes, device), checkpoint, device)
            }
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

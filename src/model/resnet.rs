use crate::model::{Classifier, blocks::LayerBlock};
use burn::{
    nn::{
        BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d, Relu,
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
    },
    prelude::*,
};

#[derive(Module, Debug)]
pub struct ResNet<B: Backend> {
    conv1: Conv2d<B>,
    norm1: BatchNorm<B, 2>,
    relu: Relu,
    maxpool: MaxPool2d,
    layer1: LayerBlock<B>,
    layer2: LayerBlock<B>,
    layer3: LayerBlock<B>,
    layer4: LayerBlock<B>,
    avgpool: AdaptiveAvgPool2d,
    fc: Linear<B>,
}

impl<B: Backend> ResNet<B> {
    pub fn new(blocks: [usize; 4], num_classes: usize, device: &Device<B>) -> Self {
        let conv1 = Conv2dConfig::new([3, 64], [7, 7])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(3, 3))
            .with_bias(false)
            .init(device);
        let norm1 = BatchNormConfig::new(64).init(device);
        let maxpool = MaxPool2dConfig::new([3, 3])
            .with_strides([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init();

        let layer1 = LayerBlock::new(blocks[0], 64, 64, 1, device);
        let layer2 = LayerBlock::new(blocks[1], 64, 128, 2, device);
        let layer3 = LayerBlock::new(blocks[2], 128, 256, 2, device);
        let layer4 = LayerBlock::new(blocks[3], 256, 512, 2, device);

        let avgpool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let fc = LinearConfig::new(512, num_classes).init(device);

        ResNet {
            conv1,
            norm1,
            relu: Relu::new(),
            maxpool,
            layer1,
            layer2,
            layer3,
            layer4,
            avgpool,
            fc,
        }
    }

    pub fn resnet18(num_classes: usize, device: &Device<B>) -> Self {
        Self::new([2, 2, 2, 2], num_classes, device)
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(input);
        let x = self.norm1.forward(x);
        let x = self.relu.forward(x);
        let x = self.maxpool.forward(x);

        let x = self.layer1.forward(x);
        let x = self.layer2.forward(x);
        let x = self.layer3.forward(x);
        let x = self.layer4.forward(x);

        let x = self.avgpool.forward(x);
        let x = x.flatten::<2>(1, 3);
        self.fc.forward(x)
    }
}

impl<B: Backend> Classifier<B> for ResNet<B> {
    fn infer(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        self.forward(images)
    }
}

/// torchvision parameter names mapped onto the fields above.
pub fn pytorch_key_remaps() -> Vec<(String, String)> {
    [
        (r"^bn1\.(.+)$", "norm1.$1"),
        (
            r"^layer([1-4])\.(\d+)\.conv([12])\.(.+)$",
            "layer$1.blocks.$2.conv$3.$4",
        ),
        (
            r"^layer([1-4])\.(\d+)\.bn([12])\.(.+)$",
            "layer$1.blocks.$2.norm$3.$4",
        ),
        (
            r"^layer([1-4])\.(\d+)\.downsample\.0\.(.+)$",
            "layer$1.blocks.$2.downsample.conv.$3",
        ),
        (
            r"^layer([1-4])\.(\d+)\.downsample\.1\.(.+)$",
            "layer$1.blocks.$2.downsample.norm.$3",
        ),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (pattern.to_owned(), replacement.to_owned()))
    .collect()
}

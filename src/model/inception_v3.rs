//! Inception-v3 with the torchvision layer layout, without the auxiliary head.

use crate::model::{Classifier, blocks::BasicConv2d};
use burn::{
    nn::{
        Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d,
        pool::{
            AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, AvgPool2d, AvgPool2dConfig, MaxPool2d,
            MaxPool2dConfig,
        },
    },
    prelude::*,
};

fn branch_avg_pool() -> AvgPool2d {
    AvgPool2dConfig::new([3, 3])
        .with_strides([1, 1])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .init()
}

fn reduction_max_pool() -> MaxPool2d {
    MaxPool2dConfig::new([3, 3]).with_strides([2, 2]).init()
}

#[derive(Module, Debug)]
pub struct InceptionA<B: Backend> {
    branch1x1: BasicConv2d<B>,
    branch5x5_1: BasicConv2d<B>,
    branch5x5_2: BasicConv2d<B>,
    branch3x3dbl_1: BasicConv2d<B>,
    branch3x3dbl_2: BasicConv2d<B>,
    branch3x3dbl_3: BasicConv2d<B>,
    pool: AvgPool2d,
    branch_pool: BasicConv2d<B>,
}

impl<B: Backend> InceptionA<B> {
    pub fn new(in_channels: usize, pool_features: usize, device: &Device<B>) -> Self {
        Self {
            branch1x1: BasicConv2d::square(in_channels, 64, 1, 1, 0, device),
            branch5x5_1: BasicConv2d::square(in_channels, 48, 1, 1, 0, device),
            branch5x5_2: BasicConv2d::square(48, 64, 5, 1, 2, device),
            branch3x3dbl_1: BasicConv2d::square(in_channels, 64, 1, 1, 0, device),
            branch3x3dbl_2: BasicConv2d::square(64, 96, 3, 1, 1, device),
            branch3x3dbl_3: BasicConv2d::square(96, 96, 3, 1, 1, device),
            pool: branch_avg_pool(),
            branch_pool: BasicConv2d::square(in_channels, pool_features, 1, 1, 0, device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let b1 = self.branch1x1.forward(x.clone());
        let b5 = self
            .branch5x5_2
            .forward(self.branch5x5_1.forward(x.clone()));
        let b3 = self.branch3x3dbl_1.forward(x.clone());
        let b3 = self.branch3x3dbl_3.forward(self.branch3x3dbl_2.forward(b3));
        let bp = self.branch_pool.forward(self.pool.forward(x));

        Tensor::cat(vec![b1, b5, b3, bp], 1)
    }
}

/// Grid reduction 35x35 -> 17x17.
#[derive(Module, Debug)]
pub struct InceptionB<B: Backend> {
    branch3x3: BasicConv2d<B>,
    branch3x3dbl_1: BasicConv2d<B>,
    branch3x3dbl_2: BasicConv2d<B>,
    branch3x3dbl_3: BasicConv2d<B>,
    pool: MaxPool2d,
}

impl<B: Backend> InceptionB<B> {
    pub fn new(in_channels: usize, device: &Device<B>) -> Self {
        Self {
            branch3x3: BasicConv2d::square(in_channels, 384, 3, 2, 0, device),
            branch3x3dbl_1: BasicConv2d::square(in_channels, 64, 1, 1, 0, device),
            branch3x3dbl_2: BasicConv2d::square(64, 96, 3, 1, 1, device),
            branch3x3dbl_3: BasicConv2d::square(96, 96, 3, 2, 0, device),
            pool: reduction_max_pool(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let b3 = self.branch3x3.forward(x.clone());
        let bd = self.branch3x3dbl_1.forward(x.clone());
        let bd = self.branch3x3dbl_3.forward(self.branch3x3dbl_2.forward(bd));
        let bp = self.pool.forward(x);

        Tensor::cat(vec![b3, bd, bp], 1)
    }
}

/// Factorized 7x7 convolutions at 17x17.
#[derive(Module, Debug)]
pub struct InceptionC<B: Backend> {
    branch1x1: BasicConv2d<B>,
    branch7x7_1: BasicConv2d<B>,
    branch7x7_2: BasicConv2d<B>,
    branch7x7_3: BasicConv2d<B>,
    branch7x7dbl_1: BasicConv2d<B>,
    branch7x7dbl_2: BasicConv2d<B>,
    branch7x7dbl_3: BasicConv2d<B>,
    branch7x7dbl_4: BasicConv2d<B>,
    branch7x7dbl_5: BasicConv2d<B>,
    pool: AvgPool2d,
    branch_pool: BasicConv2d<B>,
}

impl<B: Backend> InceptionC<B> {
    pub fn new(in_channels: usize, c7: usize, device: &Device<B>) -> Self {
        let row = |i, o| BasicConv2d::new([i, o], [1, 7], 1, [0, 3], device);
        let col = |i, o| BasicConv2d::new([i, o], [7, 1], 1, [3, 0], device);

        Self {
            branch1x1: BasicConv2d::square(in_channels, 192, 1, 1, 0, device),
            branch7x7_1: BasicConv2d::square(in_channels, c7, 1, 1, 0, device),
            branch7x7_2: row(c7, c7),
            branch7x7_3: col(c7, 192),
            branch7x7dbl_1: BasicConv2d::square(in_channels, c7, 1, 1, 0, device),
            branch7x7dbl_2: col(c7, c7),
            branch7x7dbl_3: row(c7, c7),
            branch7x7dbl_4: col(c7, c7),
            branch7x7dbl_5: row(c7, 192),
            pool: branch_avg_pool(),
            branch_pool: BasicConv2d::square(in_channels, 192, 1, 1, 0, device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let b1 = self.branch1x1.forward(x.clone());

        let b7 = self.branch7x7_1.forward(x.clone());
        let b7 = self.branch7x7_2.forward(b7);
        let b7 = self.branch7x7_3.forward(b7);

        let bd = self.branch7x7dbl_1.forward(x.clone());
        let bd = self.branch7x7dbl_2.forward(bd);
        let bd = self.branch7x7dbl_3.forward(bd);
        let bd = self.branch7x7dbl_4.forward(bd);
        let bd = self.branch7x7dbl_5.forward(bd);

        let bp = self.branch_pool.forward(self.pool.forward(x));

        Tensor::cat(vec![b1, b7, bd, bp], 1)
    }
}

/// Grid reduction 17x17 -> 8x8.
#[derive(Module, Debug)]
pub struct InceptionD<B: Backend> {
    branch3x3_1: BasicConv2d<B>,
    branch3x3_2: BasicConv2d<B>,
    branch7x7x3_1: BasicConv2d<B>,
    branch7x7x3_2: BasicConv2d<B>,
    branch7x7x3_3: BasicConv2d<B>,
    branch7x7x3_4: BasicConv2d<B>,
    pool: MaxPool2d,
}

impl<B: Backend> InceptionD<B> {
    pub fn new(in_channels: usize, device: &Device<B>) -> Self {
        Self {
            branch3x3_1: BasicConv2d::square(in_channels, 192, 1, 1, 0, device),
            branch3x3_2: BasicConv2d::square(192, 320, 3, 2, 0, device),
            branch7x7x3_1: BasicConv2d::square(in_channels, 192, 1, 1, 0, device),
            branch7x7x3_2: BasicConv2d::new([192, 192], [1, 7], 1, [0, 3], device),
            branch7x7x3_3: BasicConv2d::new([192, 192], [7, 1], 1, [3, 0], device),
            branch7x7x3_4: BasicConv2d::square(192, 192, 3, 2, 0, device),
            pool: reduction_max_pool(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let b3 = self.branch3x3_1.forward(x.clone());
        let b3 = self.branch3x3_2.forward(b3);

        let b7 = self.branch7x7x3_1.forward(x.clone());
        let b7 = self.branch7x7x3_2.forward(b7);
        let b7 = self.branch7x7x3_3.forward(b7);
        let b7 = self.branch7x7x3_4.forward(b7);

        let bp = self.pool.forward(x);

        Tensor::cat(vec![b3, b7, bp], 1)
    }
}

/// Expanded filter bank at 8x8.
#[derive(Module, Debug)]
pub struct InceptionE<B: Backend> {
    branch1x1: BasicConv2d<B>,
    branch3x3_1: BasicConv2d<B>,
    branch3x3_2a: BasicConv2d<B>,
    branch3x3_2b: BasicConv2d<B>,
    branch3x3dbl_1: BasicConv2d<B>,
    branch3x3dbl_2: BasicConv2d<B>,
    branch3x3dbl_3a: BasicConv2d<B>,
    branch3x3dbl_3b: BasicConv2d<B>,
    pool: AvgPool2d,
    branch_pool: BasicConv2d<B>,
}

impl<B: Backend> InceptionE<B> {
    pub fn new(in_channels: usize, device: &Device<B>) -> Self {
        let row = |i, o| BasicConv2d::new([i, o], [1, 3], 1, [0, 1], device);
        let col = |i, o| BasicConv2d::new([i, o], [3, 1], 1, [1, 0], device);

        Self {
            branch1x1: BasicConv2d::square(in_channels, 320, 1, 1, 0, device),
            branch3x3_1: BasicConv2d::square(in_channels, 384, 1, 1, 0, device),
            branch3x3_2a: row(384, 384),
            branch3x3_2b: col(384, 384),
            branch3x3dbl_1: BasicConv2d::square(in_channels, 448, 1, 1, 0, device),
            branch3x3dbl_2: BasicConv2d::square(448, 384, 3, 1, 1, device),
            branch3x3dbl_3a: row(384, 384),
            branch3x3dbl_3b: col(384, 384),
            pool: branch_avg_pool(),
            branch_pool: BasicConv2d::square(in_channels, 192, 1, 1, 0, device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let b1 = self.branch1x1.forward(x.clone());

        let b3 = self.branch3x3_1.forward(x.clone());
        let b3 = Tensor::cat(
            vec![
                self.branch3x3_2a.forward(b3.clone()),
                self.branch3x3_2b.forward(b3),
            ],
            1,
        );

        let bd = self.branch3x3dbl_1.forward(x.clone());
        let bd = self.branch3x3dbl_2.forward(bd);
        let bd = Tensor::cat(
            vec![
                self.branch3x3dbl_3a.forward(bd.clone()),
                self.branch3x3dbl_3b.forward(bd),
            ],
            1,
        );

        let bp = self.branch_pool.forward(self.pool.forward(x));

        Tensor::cat(vec![b1, b3, bd, bp], 1)
    }
}

#[derive(Module, Debug)]
pub struct InceptionV3<B: Backend> {
    conv2d_1a_3x3: BasicConv2d<B>,
    conv2d_2a_3x3: BasicConv2d<B>,
    conv2d_2b_3x3: BasicConv2d<B>,
    maxpool1: MaxPool2d,
    conv2d_3b_1x1: BasicConv2d<B>,
    conv2d_4a_3x3: BasicConv2d<B>,
    maxpool2: MaxPool2d,
    mixed_5b: InceptionA<B>,
    mixed_5c: InceptionA<B>,
    mixed_5d: InceptionA<B>,
    mixed_6a: InceptionB<B>,
    mixed_6b: InceptionC<B>,
    mixed_6c: InceptionC<B>,
    mixed_6d: InceptionC<B>,
    mixed_6e: InceptionC<B>,
    mixed_7a: InceptionD<B>,
    mixed_7b: InceptionE<B>,
    mixed_7c: InceptionE<B>,
    avgpool: AdaptiveAvgPool2d,
    dropout: Dropout,
    fc: Linear<B>,
}

impl<B: Backend> InceptionV3<B> {
    pub fn new(num_classes: usize, device: &Device<B>) -> Self {
        Self {
            conv2d_1a_3x3: BasicConv2d::square(3, 32, 3, 2, 0, device),
            conv2d_2a_3x3: BasicConv2d::square(32, 32, 3, 1, 0, device),
            conv2d_2b_3x3: BasicConv2d::square(32, 64, 3, 1, 1, device),
            maxpool1: reduction_max_pool(),
            conv2d_3b_1x1: BasicConv2d::square(64, 80, 1, 1, 0, device),
            conv2d_4a_3x3: BasicConv2d::square(80, 192, 3, 1, 0, device),
            maxpool2: reduction_max_pool(),
            mixed_5b: InceptionA::new(192, 32, device),
            mixed_5c: InceptionA::new(256, 64, device),
            mixed_5d: InceptionA::new(288, 64, device),
            mixed_6a: InceptionB::new(288, device),
            mixed_6b: InceptionC::new(768, 128, device),
            mixed_6c: InceptionC::new(768, 160, device),
            mixed_6d: InceptionC::new(768, 160, device),
            mixed_6e: InceptionC::new(768, 192, device),
            mixed_7a: InceptionD::new(768, device),
            mixed_7b: InceptionE::new(1280, device),
            mixed_7c: InceptionE::new(2048, device),
            avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            dropout: DropoutConfig::new(0.5).init(),
            fc: LinearConfig::new(2048, num_classes).init(device),
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        // 299x299 -> 35x35
        let x = self.conv2d_1a_3x3.forward(input);
        let x = self.conv2d_2a_3x3.forward(x);
        let x = self.conv2d_2b_3x3.forward(x);
        let x = self.maxpool1.forward(x);
        let x = self.conv2d_3b_1x1.forward(x);
        let x = self.conv2d_4a_3x3.forward(x);
        let x = self.maxpool2.forward(x);

        let x = self.mixed_5b.forward(x);
        let x = self.mixed_5c.forward(x);
        let x = self.mixed_5d.forward(x);
        let x = self.mixed_6a.forward(x);
        let x = self.mixed_6b.forward(x);
        let x = self.mixed_6c.forward(x);
        let x = self.mixed_6d.forward(x);
        let x = self.mixed_6e.forward(x);
        let x = self.mixed_7a.forward(x);
        let x = self.mixed_7b.forward(x);
        let x = self.mixed_7c.forward(x);

        let x = self.avgpool.forward(x);
        let x = self.dropout.forward(x.flatten::<2>(1, 3));
        self.fc.forward(x)
    }
}

impl<B: Backend> Classifier<B> for InceptionV3<B> {
    fn infer(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        self.forward(images)
    }
}

/// torchvision capitalizes the stem and mixed block names; the auxiliary head has no field.
pub fn pytorch_key_remaps() -> Vec<(String, String)> {
    vec![
        (r"^Conv2d_(.+)$".to_owned(), "conv2d_$1".to_owned()),
        (r"^Mixed_(.+)$".to_owned(), "mixed_$1".to_owned()),
    ]
}

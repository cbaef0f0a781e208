//! Batch-normalized Inception (Inception-v2).
//!
//! Every mixed module shares one shape: an optional 1x1 branch, a 3x3 branch, a double-3x3
//! branch and a pooling branch with an optional projection. The two grid reductions
//! (`inception_3c`, `inception_4e`) drop the 1x1 branch, stride the 3x3 branches and pass the
//! max-pooled input through.

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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Avg,
    Max,
}

/// Branch widths of one mixed module.
#[derive(Clone, Copy, Debug)]
pub struct MixedSpec {
    pub c1x1: Option<usize>,
    pub c3x3_reduce: usize,
    pub c3x3: usize,
    pub dbl_reduce: usize,
    pub dbl: usize,
    pub pool: PoolKind,
    pub proj: Option<usize>,
    pub stride: usize,
}

impl MixedSpec {
    const fn regular(
        c1x1: usize,
        c3x3: [usize; 2],
        dbl: [usize; 2],
        pool: PoolKind,
        proj: usize,
    ) -> Self {
        Self {
            c1x1: Some(c1x1),
            c3x3_reduce: c3x3[0],
            c3x3: c3x3[1],
            dbl_reduce: dbl[0],
            dbl: dbl[1],
            pool,
            proj: Some(proj),
            stride: 1,
        }
    }

    const fn reduction(c3x3: [usize; 2], dbl: [usize; 2]) -> Self {
        Self {
            c1x1: None,
            c3x3_reduce: c3x3[0],
            c3x3: c3x3[1],
            dbl_reduce: dbl[0],
            dbl: dbl[1],
            pool: PoolKind::Max,
            proj: None,
            stride: 2,
        }
    }

    pub fn out_channels(&self, in_channels: usize) -> usize {
        self.c1x1.unwrap_or(0) + self.c3x3 + self.dbl + self.proj.unwrap_or(in_channels)
    }
}

/// `(name, spec)` of the ten mixed modules, input 192 channels.
pub const MIXED_TABLE: [(&str, MixedSpec); 10] = {
    use PoolKind::{Avg, Max};
    [
        ("3a", MixedSpec::regular(64, [64, 64], [64, 96], Avg, 32)),
        ("3b", MixedSpec::regular(64, [64, 96], [64, 96], Avg, 64)),
        ("3c", MixedSpec::reduction([128, 160], [64, 96])),
        ("4a", MixedSpec::regular(224, [64, 96], [96, 128], Avg, 128)),
        ("4b", MixedSpec::regular(192, [96, 128], [96, 128], Avg, 128)),
        ("4c", MixedSpec::regular(160, [128, 160], [128, 160], Avg, 128)),
        ("4d", MixedSpec::regular(96, [128, 192], [160, 192], Avg, 128)),
        ("4e", MixedSpec::reduction([128, 192], [192, 256])),
        ("5a", MixedSpec::regular(352, [192, 320], [160, 224], Avg, 128)),
        ("5b", MixedSpec::regular(352, [192, 320], [192, 224], Max, 128)),
    ]
};

#[derive(Module, Debug)]
pub struct MixedBlock<B: Backend> {
    branch1x1: Option<BasicConv2d<B>>,
    branch3x3_reduce: BasicConv2d<B>,
    branch3x3: BasicConv2d<B>,
    branch3x3dbl_reduce: BasicConv2d<B>,
    branch3x3dbl_1: BasicConv2d<B>,
    branch3x3dbl_2: BasicConv2d<B>,
    avg_pool: Option<AvgPool2d>,
    max_pool: Option<MaxPool2d>,
    branch_pool: Option<BasicConv2d<B>>,
}

impl<B: Backend> MixedBlock<B> {
    pub fn new(in_channels: usize, spec: &MixedSpec, device: &Device<B>) -> Self {
        let stride = spec.stride;
        let padding = PaddingConfig2d::Explicit(1, 1);
        let (avg_pool, max_pool) = match spec.pool {
            PoolKind::Avg => (
                Some(
                    AvgPool2dConfig::new([3, 3])
                        .with_strides([stride, stride])
                        .with_padding(padding)
                        .init(),
                ),
                None,
            ),
            PoolKind::Max => (
                None,
                Some(
                    MaxPool2dConfig::new([3, 3])
                        .with_strides([stride, stride])
                        .with_padding(padding)
                        .init(),
                ),
            ),
        };

        Self {
            branch1x1: spec
                .c1x1
                .map(|c| BasicConv2d::square(in_channels, c, 1, 1, 0, device)),
            branch3x3_reduce: BasicConv2d::square(in_channels, spec.c3x3_reduce, 1, 1, 0, device),
            branch3x3: BasicConv2d::square(spec.c3x3_reduce, spec.c3x3, 3, stride, 1, device),
            branch3x3dbl_reduce: BasicConv2d::square(in_channels, spec.dbl_reduce, 1, 1, 0, device),
            branch3x3dbl_1: BasicConv2d::square(spec.dbl_reduce, spec.dbl, 3, 1, 1, device),
            branch3x3dbl_2: BasicConv2d::square(spec.dbl, spec.dbl, 3, stride, 1, device),
            avg_pool,
            max_pool,
            branch_pool: spec
                .proj
                .map(|c| BasicConv2d::square(in_channels, c, 1, 1, 0, device)),
        }
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut branches = Vec::with_capacity(4);

        if let Some(branch1x1) = &self.branch1x1 {
            branches.push(branch1x1.forward(x.clone()));
        }

        let b3 = self.branch3x3_reduce.forward(x.clone());
        branches.push(self.branch3x3.forward(b3));

        let bd = self.branch3x3dbl_reduce.forward(x.clone());
        let bd = self.branch3x3dbl_1.forward(bd);
        branches.push(self.branch3x3dbl_2.forward(bd));

        let pooled = match (&self.avg_pool, &self.max_pool) {
            (Some(pool), _) => pool.forward(x),
            (None, Some(pool)) => pool.forward(x),
            (None, None) => x,
        };
        branches.push(match &self.branch_pool {
            Some(proj) => proj.forward(pooled),
            None => pooled,
        });

        Tensor::cat(branches, 1)
    }
}

#[derive(Module, Debug)]
pub struct InceptionV2<B: Backend> {
    conv1_7x7_s2: BasicConv2d<B>,
    pool1: MaxPool2d,
    conv2_3x3_reduce: BasicConv2d<B>,
    conv2_3x3: BasicConv2d<B>,
    pool2: MaxPool2d,
    mixed: Vec<MixedBlock<B>>,
    avgpool: AdaptiveAvgPool2d,
    dropout: Dropout,
    fc: Linear<B>,
}

impl<B: Backend> InceptionV2<B> {
    pub fn new(num_classes: usize, device: &Device<B>) -> Self {
        let stem_pool = || {
            MaxPool2dConfig::new([3, 3])
                .with_strides([2, 2])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init()
        };

        let mut in_channels = 192;
        let mixed = MIXED_TABLE
            .iter()
            .map(|(_, spec)| {
                let block = MixedBlock::new(in_channels, spec, device);
                in_channels = spec.out_channels(in_channels);
                block
            })
            .collect();

        Self {
            conv1_7x7_s2: BasicConv2d::square(3, 64, 7, 2, 3, device),
            pool1: stem_pool(),
            conv2_3x3_reduce: BasicConv2d::square(64, 64, 1, 1, 0, device),
            conv2_3x3: BasicConv2d::square(64, 192, 3, 1, 1, device),
            pool2: stem_pool(),
            mixed,
            avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            dropout: DropoutConfig::new(0.2).init(),
            fc: LinearConfig::new(in_channels, num_classes).init(device),
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1_7x7_s2.forward(input);
        let x = self.pool1.forward(x);
        let x = self.conv2_3x3_reduce.forward(x);
        let x = self.conv2_3x3.forward(x);
        let mut x = self.pool2.forward(x);

        for block in &self.mixed {
            x = block.forward(x);
        }

        let x = self.avgpool.forward(x);
        let x = self.dropout.forward(x.flatten::<2>(1, 3));
        self.fc.forward(x)
    }
}

impl<B: Backend> Classifier<B> for InceptionV2<B> {
    fn infer(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        self.forward(images)
    }
}

/// Checkpoints name mixed modules `inception_<id>`; they live in `mixed.<index>` here.
pub fn pytorch_key_remaps() -> Vec<(String, String)> {
    MIXED_TABLE
        .iter()
        .enumerate()
        .map(|(index, (name, _))| {
            (
                format!(r"^inception_{name}\.(.+)$"),
                format!("mixed.{index}.$1"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_table_widths_chain() {
        let mut channels = 192;
        let widths: Vec<usize> = MIXED_TABLE
            .iter()
            .map(|(_, spec)| {
                channels = spec.out_channels(channels);
                channels
            })
            .collect();

        assert_eq!(
            widths,
            vec![256, 320, 576, 576, 576, 608, 608, 1056, 1024, 1024]
        );
    }
}

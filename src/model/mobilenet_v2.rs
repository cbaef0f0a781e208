use crate::model::Classifier;
use burn::{
    nn::{
        BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d,
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig},
    },
    prelude::*,
};

/// `(expansion, out_channels, repeats, first_stride)` for each stage.
const INVERTED_RESIDUAL_SETTINGS: [(usize, usize, usize, usize); 7] = [
    (1, 16, 1, 1),
    (6, 24, 2, 2),
    (6, 32, 3, 2),
    (6, 64, 4, 2),
    (6, 96, 3, 1),
    (6, 160, 3, 2),
    (6, 320, 1, 1),
];

const STEM_CHANNELS: usize = 32;
const HEAD_CHANNELS: usize = 1280;

fn relu6<B: Backend>(x: Tensor<B, 4>) -> Tensor<B, 4> {
    x.clamp(0.0, 6.0)
}

/// Convolution, batch norm and ReLU6.
#[derive(Module, Debug)]
pub struct ConvNormActivation<B: Backend> {
    conv: Conv2d<B>,
    norm: BatchNorm<B, 2>,
}

impl<B: Backend> ConvNormActivation<B> {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel: usize,
        stride: usize,
        groups: usize,
        device: &Device<B>,
    ) -> Self {
        let padding = (kernel - 1) / 2;
        let conv = Conv2dConfig::new([in_channels, out_channels], [kernel, kernel])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(padding, padding))
            .with_groups(groups)
            .with_bias(false)
            .init(device);
        let norm = BatchNormConfig::new(out_channels).init(device);

        Self { conv, norm }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        relu6(self.norm.forward(self.conv.forward(input)))
    }
}

#[derive(Module, Debug)]
pub struct InvertedResidual<B: Backend> {
    expand: Option<ConvNormActivation<B>>,
    depthwise: ConvNormActivation<B>,
    project: Conv2d<B>,
    project_norm: BatchNorm<B, 2>,
}

impl<B: Backend> InvertedResidual<B> {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        stride: usize,
        expansion: usize,
        device: &Device<B>,
    ) -> Self {
        let hidden = in_channels * expansion;
        let expand = (expansion != 1)
            .then(|| ConvNormActivation::new(in_channels, hidden, 1, 1, 1, device));
        let depthwise = ConvNormActivation::new(hidden, hidden, 3, stride, hidden, device);
        let project = Conv2dConfig::new([hidden, out_channels], [1, 1])
            .with_bias(false)
            .init(device);
        let project_norm = BatchNormConfig::new(out_channels).init(device);

        Self {
            expand,
            depthwise,
            project,
            project_norm,
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = match &self.expand {
            Some(expand) => expand.forward(input.clone()),
            None => input.clone(),
        };
        let x = self.depthwise.forward(x);
        let x = self.project_norm.forward(self.project.forward(x));

        // Residual only where stride 1 keeps the shape unchanged.
        if x.dims() == input.dims() { x + input } else { x }
    }
}

#[derive(Module, Debug)]
pub struct MobileNetV2<B: Backend> {
    stem: ConvNormActivation<B>,
    blocks: Vec<InvertedResidual<B>>,
    head: ConvNormActivation<B>,
    avgpool: AdaptiveAvgPool2d,
    dropout: Dropout,
    classifier: Linear<B>,
}

impl<B: Backend> MobileNetV2<B> {
    pub fn new(num_classes: usize, device: &Device<B>) -> Self {
        let stem = ConvNormActivation::new(3, STEM_CHANNELS, 3, 2, 1, device);

        let mut blocks = Vec::new();
        let mut in_channels = STEM_CHANNELS;
        for (expansion, out_channels, repeats, stride) in INVERTED_RESIDUAL_SETTINGS {
            for i in 0..repeats {
                let stride = if i == 0 { stride } else { 1 };
                blocks.push(InvertedResidual::new(
                    in_channels,
                    out_channels,
                    stride,
                    expansion,
                    device,
                ));
                in_channels = out_channels;
            }
        }

        let head = ConvNormActivation::new(in_channels, HEAD_CHANNELS, 1, 1, 1, device);

        Self {
            stem,
            blocks,
            head,
            avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            dropout: DropoutConfig::new(0.2).init(),
            classifier: LinearConfig::new(HEAD_CHANNELS, num_classes).init(device),
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = self.stem.forward(input);
        for block in &self.blocks {
            x = block.forward(x);
        }
        let x = self.head.forward(x);

        let x = self.avgpool.forward(x);
        let x = self.dropout.forward(x.flatten::<2>(1, 3));
        self.classifier.forward(x)
    }
}

impl<B: Backend> Classifier<B> for MobileNetV2<B> {
    fn infer(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        self.forward(images)
    }
}

/// torchvision keeps everything in one `features` sequential; split it into
/// `stem`, `blocks` and `head`.
pub fn pytorch_key_remaps() -> Vec<(String, String)> {
    let num_blocks: usize = INVERTED_RESIDUAL_SETTINGS.iter().map(|s| s.2).sum();
    let head_index = num_blocks + 1;

    let mut remaps = vec![
        (r"^features\.0\.0\.(.+)$".to_owned(), "stem.conv.$1".to_owned()),
        (r"^features\.0\.1\.(.+)$".to_owned(), "stem.norm.$1".to_owned()),
        (
            format!(r"^features\.{head_index}\.0\.(.+)$"),
            "head.conv.$1".to_owned(),
        ),
        (
            format!(r"^features\.{head_index}\.1\.(.+)$"),
            "head.norm.$1".to_owned(),
        ),
        (r"^classifier\.1\.(.+)$".to_owned(), "classifier.$1".to_owned()),
    ];

    for feature in 1..=num_blocks {
        let block = feature - 1;
        let layers: &[(&str, &str)] = if block == 0 {
            &[
                ("0.0", "depthwise.conv"),
                ("0.1", "depthwise.norm"),
                ("1", "project"),
                ("2", "project_norm"),
            ]
        } else {
            &[
                ("0.0", "expand.conv"),
                ("0.1", "expand.norm"),
                ("1.0", "depthwise.conv"),
                ("1.1", "depthwise.norm"),
                ("2", "project"),
                ("3", "project_norm"),
            ]
        };
        for (source, target) in layers {
            let source = source.replace('.', r"\.");
            remaps.push((
                format!(r"^features\.{feature}\.conv\.{source}\.(.+)$"),
                format!("blocks.{block}.{target}.$1"),
            ));
        }
    }

    remaps
}

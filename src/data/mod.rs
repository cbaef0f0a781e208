pub mod conversion;
pub mod labels;
pub mod normalize;
pub mod samples;

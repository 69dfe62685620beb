//! Seagrass coverage analysis pipeline
//!
//! This module estimates seagrass and white-sand coverage from a single quadrat
//! photograph, with separate modules for each stage and an orchestrator that
//! runs them in order.

pub mod analysis;
pub mod color;
pub mod common;
pub mod config;
pub mod decode;
pub mod mask;
pub mod metrics;
pub mod morphology;
pub mod preprocess;
pub mod refine;
pub mod render;
pub mod segment;

pub use common::{
    AnalysisError,
    Result,
};

pub use config::{
    CarbonConfig,
    ConfigOverrides,
    PipelineOptions,
    PipelineOptionsBuilder,
};

pub use decode::{
    ImageReader,
    StandardImageReader,
};

pub use mask::ClassMask;
pub use refine::RefinedMasks;

pub use render::{
    EncodedOverlay,
    OverlayEncoder,
    PngBase64Encoder,
};

pub use analysis::{
    AnalysisResult,
    AnalysisSummary,
    Classification,
    PipelineTimings,
    SeagrassPipeline,
    Stage,
};

mod pipeline;
mod result;
mod timing;


pub use pipeline::SeagrassPipeline;
pub use result::{AnalysisResult, AnalysisSummary, Classification};
pub use timing::{PipelineTimings, Stage};

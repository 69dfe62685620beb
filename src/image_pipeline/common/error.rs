use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Cannot read image: {0}")]
    DecodeError(String),

    #[error("Degenerate image: width={width}, height={height}")]
    DegenerateInput { width: u32, height: u32 },

    #[error("Failed to encode overlay: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalysisError {
    /// True for failures caused by the submitted image rather than the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::DecodeError(_) | AnalysisError::DegenerateInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

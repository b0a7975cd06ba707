use crate::particles::QualityError;

/// Rendering failures.
///
/// `ShaderCompile`, `ProgramLink` and `Surface` are fatal: the pipeline moves to `Failed` and refuses
/// further work. There is no degraded rendering mode.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("failed to build GPU program: {0}")]
    ProgramLink(String),

    #[error("surface lost: {0}")]
    Surface(String),

    #[error(transparent)]
    Quality(#[from] QualityError),
}

impl RenderError {
    /// Whether this error ends the pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RenderError::ShaderCompile(_) | RenderError::ProgramLink(_) | RenderError::Surface(_)
        )
    }
}

/// Failure to obtain a frame from the capture source
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture source not started")]
    NotStarted,

    #[error("no frame ready")]
    NoFrame,

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("capture source error: {0}")]
    Source(String),
}

/// Per-tick failures. None of these stop the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(#[from] CaptureError),

    #[error("no text recognized")]
    RecognitionEmpty,

    #[error("translation failed")]
    TranslationFailure,
}

/// Why the sharpen pass was skipped
#[derive(Debug, thiserror::Error)]
pub enum SharpenError {
    #[error("{pixels} pixels over the sharpen limit of {limit}")]
    TooLarge { pixels: u64, limit: u64 },

    #[error("output buffer: {0}")]
    Alloc(#[from] std::collections::TryReserveError),
}

pub mod error;
pub mod frame;
pub mod geometry;
pub mod preprocess;
pub mod state;

pub use error::{CaptureError, PipelineError, SharpenError};
pub use frame::{DisplayFrame, ProcessedImage, safe_crop};
pub use geometry::{GeometryEngine, GeometryLimits};
pub use preprocess::ImagePreprocessor;
pub use state::{Observation, PollState};

pub mod pipeline;

pub use pipeline::{ImagePolicy, PipelineError, UploadedFile};

pub mod config;
pub mod error;
pub mod frame;
pub mod inference;
pub mod pipeline;
pub mod tagging;

pub use config::{ConfigError, TaggerConfig};
pub use error::TaggerError;
pub use pipeline::{PipelineStage, TagOutcome, TaggingPipeline};

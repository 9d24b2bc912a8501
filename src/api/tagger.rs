//! GIF 打标签入口

use std::path::Path;

use log::info;

use crate::api::models::tag_result::TagResult;
use crate::core::inference::Collaborators;
use crate::core::{TaggerConfig, TaggerError, TaggingPipeline};

/// GIF 打标签器 - 抽帧 + 描述 + OCR + 安全检测 → 标签
///
/// ```no_run
/// use gif_tagger::api::tagger::GifTagger;
///
/// let tagger = GifTagger::from_env()?;
/// let result = tagger.tag_gif("uploads/party.gif");
/// println!("{}", result.to_json());
/// # Ok::<(), gif_tagger::core::TaggerError>(())
/// ```
pub struct GifTagger {
    pipeline: TaggingPipeline,
}

impl GifTagger {
    /// Builds the tagger with the backend named in `config`.
    pub fn create(config: TaggerConfig) -> Result<Self, TaggerError> {
        config.validate()?;
        let collaborators = Collaborators::from_config(&config.inference)?;
        Ok(Self::with_collaborators(&config, collaborators))
    }

    /// Builds the tagger around caller-supplied collaborators.
    pub fn with_collaborators(config: &TaggerConfig, collaborators: Collaborators) -> Self {
        info!("🏷️ GifTagger: created");
        Self {
            pipeline: TaggingPipeline::new(config, collaborators),
        }
    }

    /// Config from `GIF_TAGGER_CONFIG`, or the defaults.
    pub fn from_env() -> Result<Self, TaggerError> {
        Self::create(TaggerConfig::from_env()?)
    }

    /// Never fails: every pipeline error becomes the failure shape.
    pub fn tag_gif(&self, path: impl AsRef<Path>) -> TagResult {
        let path = path.as_ref();
        info!("🎞️ Tagging {:?}", path);

        match self.pipeline.process(path) {
            Ok(outcome) => TagResult::Success(outcome),
            Err(err) => TagResult::failure(err.to_string()),
        }
    }
}

impl Drop for GifTagger {
    fn drop(&mut self) {
        info!("🗑️ GifTagger: released");
    }
}

//! 编排器 - 抽帧 → {描述, OCR, 安全检测} → 标签合成
//!
//! 线性状态机，任一步失败直接进入 Failed，后续步骤不再执行。

use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::core::config::TaggerConfig;
use crate::core::error::TaggerError;
use crate::core::frame::{Frame, FrameExtractor};
use crate::core::inference::{Collaborators, InferenceError};
use crate::core::tagging::{Detection, SafetyPolicy, TagSynthesizer, TextNormalizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    FrameExtracted,
    Captioned,
    OcrDone,
    SafetyChecked,
    Synthesized,
    Done,
    Failed,
}

impl PipelineStage {
    /// Next stage on the success path. `Done` and `Failed` are terminal.
    pub fn next(self) -> PipelineStage {
        match self {
            PipelineStage::Start => PipelineStage::FrameExtracted,
            PipelineStage::FrameExtracted => PipelineStage::Captioned,
            PipelineStage::Captioned => PipelineStage::OcrDone,
            PipelineStage::OcrDone => PipelineStage::SafetyChecked,
            PipelineStage::SafetyChecked => PipelineStage::Synthesized,
            PipelineStage::Synthesized => PipelineStage::Done,
            PipelineStage::Done => PipelineStage::Done,
            PipelineStage::Failed => PipelineStage::Failed,
        }
    }
}

struct StageTracker {
    stage: PipelineStage,
    started: Instant,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: PipelineStage::Start,
            started: Instant::now(),
        }
    }

    fn advance(&mut self) {
        let next = self.stage.next();
        debug!(
            "{:?} -> {:?} ({}ms)",
            self.stage,
            next,
            self.started.elapsed().as_millis()
        );
        self.stage = next;
    }

    /// Walks forward on the success path until `target`, logging every transition.
    fn reach(&mut self, target: PipelineStage) {
        while self.stage != target
            && !matches!(self.stage, PipelineStage::Done | PipelineStage::Failed)
        {
            self.advance();
        }
    }

    fn fail(&mut self, err: &TaggerError) {
        error!("❌ {:?} -> Failed: [{}] {}", self.stage, err.kind(), err);
        self.stage = PipelineStage::Failed;
    }
}

/// Successful tagging of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct TagOutcome {
    pub tags: Vec<String>,
    pub caption: String,
    pub ocr_text: String,
    pub is_nsfw: bool,
}

/// An inference error and the last stage that completed before it.
#[derive(Debug)]
struct InferenceFailure {
    completed: PipelineStage,
    error: TaggerError,
}

impl InferenceFailure {
    fn after(completed: PipelineStage, error: impl Into<TaggerError>) -> Self {
        Self {
            completed,
            error: error.into(),
        }
    }
}

/// Raw collaborator output for one frame.
#[derive(Debug)]
struct Signals {
    caption: String,
    ocr_lines: Vec<String>,
    detections: Vec<Detection>,
}

pub struct TaggingPipeline {
    extractor: FrameExtractor,
    collaborators: Collaborators,
    normalizer: TextNormalizer,
    synthesizer: TagSynthesizer,
    safety: SafetyPolicy,
    parallel: bool,
    timeout: Option<Duration>,
}

impl TaggingPipeline {
    pub fn new(config: &TaggerConfig, collaborators: Collaborators) -> Self {
        Self {
            extractor: FrameExtractor::with_config(config.frame.clone()),
            collaborators,
            normalizer: TextNormalizer::with_stop_words(&config.tags.stop_words),
            synthesizer: TagSynthesizer::with_config(&config.tags),
            safety: SafetyPolicy::with_config(&config.safety),
            parallel: config.inference.parallel,
            timeout: config.inference.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn process(&self, path: &Path) -> Result<TagOutcome, TaggerError> {
        let mut tracker = StageTracker::new();
        let result = self.run_stages(path, &mut tracker);
        if let Err(err) = &result {
            tracker.fail(err);
        }
        result
    }

    fn run_stages(
        &self,
        path: &Path,
        tracker: &mut StageTracker,
    ) -> Result<TagOutcome, TaggerError> {
        let frame = self.extractor.extract(path)?;
        info!(
            "🎬 Frame #{} extracted from {:?} ({}x{})",
            frame.frame_number, path, frame.width, frame.height
        );
        tracker.advance();

        let signals = self.run_inference(frame).map_err(|failure| {
            tracker.reach(failure.completed);
            failure.error
        })?;
        tracker.reach(PipelineStage::OcrDone);

        let ocr_text = signals.ocr_lines.join(" ");
        let is_nsfw = self.safety.decide(&signals.detections);
        tracker.advance();

        let tokens = self.normalizer.normalize(&signals.caption, &ocr_text);
        let tags = self.synthesizer.synthesize(&tokens, is_nsfw);
        tracker.advance();

        info!("✅ {} tags for {:?} (nsfw: {})", tags.len(), path, is_nsfw);
        tracker.advance();

        Ok(TagOutcome {
            tags,
            caption: signals.caption,
            ocr_text,
            is_nsfw,
        })
    }

    /// Runs the three collaborators, bounded by the deadline when one is set.
    /// On timeout the worker is left to finish on its own and its result is dropped.
    fn run_inference(&self, frame: Frame) -> Result<Signals, InferenceFailure> {
        let Some(limit) = self.timeout else {
            return infer(&self.collaborators, &frame, self.parallel);
        };

        let (tx, rx) = mpsc::channel();
        let collaborators = self.collaborators.clone();
        let parallel = self.parallel;
        thread::Builder::new()
            .name("gif-tagger-inference".to_string())
            .spawn(move || {
                let _ = tx.send(infer(&collaborators, &frame, parallel));
            })
            .map_err(|e| InferenceFailure::after(PipelineStage::FrameExtracted, e))?;

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!("⏱️ Inference exceeded {}ms, discarding", limit.as_millis());
                Err(InferenceFailure::after(
                    PipelineStage::FrameExtracted,
                    TaggerError::Timeout(limit),
                ))
            }
            Err(RecvTimeoutError::Disconnected) => Err(InferenceFailure::after(
                PipelineStage::FrameExtracted,
                InferenceError::Backend("inference worker exited without a result".to_string()),
            )),
        }
    }
}

/// Caption, OCR and safety share nothing but the read-only frame. When several fail the
/// first in that order is reported, tagged with the stage reached before it.
fn infer(
    collaborators: &Collaborators,
    frame: &Frame,
    parallel: bool,
) -> Result<Signals, InferenceFailure> {
    if !parallel {
        let caption = collaborators
            .captioner
            .caption(frame)
            .map_err(|e| InferenceFailure::after(PipelineStage::FrameExtracted, e))?;
        let ocr_lines = collaborators
            .text_extractor
            .extract_text(frame)
            .map_err(|e| InferenceFailure::after(PipelineStage::Captioned, e))?;
        let detections = collaborators
            .safety_classifier
            .classify(frame)
            .map_err(|e| InferenceFailure::after(PipelineStage::OcrDone, e))?;
        return Ok(Signals {
            caption,
            ocr_lines,
            detections,
        });
    }

    let (caption, (ocr_lines, detections)) = rayon::join(
        || collaborators.captioner.caption(frame),
        || {
            rayon::join(
                || collaborators.text_extractor.extract_text(frame),
                || collaborators.safety_classifier.classify(frame),
            )
        },
    );

    Ok(Signals {
        caption: caption.map_err(|e| InferenceFailure::after(PipelineStage::FrameExtracted, e))?,
        ocr_lines: ocr_lines.map_err(|e| InferenceFailure::after(PipelineStage::Captioned, e))?,
        detections: detections.map_err(|e| InferenceFailure::after(PipelineStage::OcrDone, e))?,
    })
}

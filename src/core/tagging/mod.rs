//! 标签生成 - 描述 + OCR 文本 + 安全判定 → 有界、有序、去重的标签列表
//!
//! 1. 安全判定 - 类别白名单 + 置信度阈值
//! 2. 文本归一化 - 小写、分词、去停用词、去重
//! 3. 标签合成 - 截断、nsfw 优先、补足最少数量

pub mod normalizer;
pub mod safety;
pub mod synthesizer;

pub use normalizer::TextNormalizer;
pub use safety::{Detection, SafetyConfig, SafetyPolicy};
pub use synthesizer::{TagConfig, TagSynthesizer, NSFW_TAG};

pub mod models;
pub mod tagger;

pub use models::TagResult;
pub use tagger::GifTagger;

pub mod tag_result;

pub use tag_result::TagResult;

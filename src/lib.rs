pub mod api;
pub mod core;

pub use api::{GifTagger, TagResult};

/// Logs go to stderr; stdout is reserved for the result JSON.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .try_init();
}

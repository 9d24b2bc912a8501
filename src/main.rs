use std::path::PathBuf;
use std::process::ExitCode;

use gif_tagger::{GifTagger, TagResult};
use log::error;

fn main() -> ExitCode {
    gif_tagger::init_logging();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        println!("{}", TagResult::failure("No file path provided").to_json());
        return ExitCode::from(1);
    };

    // configuration problems are reported like any other failed run
    let result = match GifTagger::from_env() {
        Ok(tagger) => tagger.tag_gif(&path),
        Err(err) => {
            error!("❌ Failed to initialize tagger: [{}] {}", err.kind(), err);
            TagResult::failure(err.to_string())
        }
    };

    println!("{}", result.to_json());
    ExitCode::SUCCESS
}

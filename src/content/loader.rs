//! Loader for the RON game configuration at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::GameConfig;

pub const CONFIG_PATH: &str = "assets/config/squid_escape.ron";

/// Error type for configuration loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a configuration document. `file` is only used for error context.
pub fn parse_config(file: &str, contents: &str) -> Result<GameConfig, ContentLoadError> {
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

pub fn load_config(path: &Path) -> Result<GameConfig, ContentLoadError> {
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_config(&file_name, &contents)
}

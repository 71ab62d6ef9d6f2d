use thiserror::Error;
use xml_settings_core::{ParseError, WriteError};

/// A failure converting one settings file. Carries the offending path.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: String,
        source: walkdir::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse { path: String, source: ParseError },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: WriteError },
}

use core::fmt;
use std::path::PathBuf;

use crate::vdf::parser::ParseError;

/// Everything that can stop a run. None of these are recovered from.
#[derive(Debug)]
pub enum CoreError {
    /// Reading a file or listing a directory failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The recursive-descent converter rejected the text.
    Parse { path: PathBuf, source: ParseError },
    /// The regex converter produced text `serde_json` could not parse.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A key expected along a record path is absent.
    MissingKey { path: PathBuf, key: String },
    /// A key was found but holds a string where a block was expected (or vice versa).
    NotARecord { path: PathBuf, key: String },
    /// The user-data directory holds no user directories.
    NoUser { dir: PathBuf },
    /// The home directory could not be resolved.
    NoHome,
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a file path to an error raised while walking an in-memory record.
    pub(crate) fn with_path(self, file: &std::path::Path) -> Self {
        match self {
            CoreError::MissingKey { key, .. } => CoreError::MissingKey {
                path: file.to_path_buf(),
                key,
            },
            CoreError::NotARecord { key, .. } => CoreError::NotARecord {
                path: file.to_path_buf(),
                key,
            },
            other => other,
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            CoreError::Parse { path, source } => write!(f, "parse {}: {source}", path.display()),
            CoreError::Json { path, source } => {
                write!(f, "parse {} (json): {source}", path.display())
            }
            CoreError::MissingKey { path, key } => {
                write!(f, "{}: missing key '{key}'", path.display())
            }
            CoreError::NotARecord { path, key } => {
                write!(f, "{}: unexpected value type at '{key}'", path.display())
            }
            CoreError::NoUser { dir } => write!(f, "no user found in {}", dir.display()),
            CoreError::NoHome => f.write_str("could not resolve home directory"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Io { source, .. } => Some(source),
            CoreError::Parse { source, .. } => Some(source),
            CoreError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

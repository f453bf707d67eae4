//! Text key-value format (`.vdf` / `.acf`) to `Record`.

pub mod json;
pub mod parser;
pub mod record;

use core::fmt;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, str::FromStr, sync::Arc};

use crate::{CoreLog, error::CoreError};
use record::Record;

/// Which text-to-record converter to run.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    /// `parser::parse`
    #[default]
    Descent,
    /// `json::parse`
    Regex,
}

impl Converter {
    pub fn name(&self) -> &'static str {
        match self {
            Converter::Descent => "descent",
            Converter::Regex => "regex",
        }
    }

    /// Convert `text`; `path` only labels errors.
    pub fn convert(&self, text: &str, path: &Path) -> Result<Record, CoreError> {
        match self {
            Converter::Descent => parser::parse(text).map_err(|source| CoreError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Converter::Regex => json::parse(text).map_err(|source| CoreError::Json {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Converter {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descent" | "parser" => Ok(Converter::Descent),
            "regex" | "json" => Ok(Converter::Regex),
            _ => Err("expected one of: descent, regex"),
        }
    }
}

/// Read a whole file and convert it.
pub fn load_record(
    path: &Path,
    converter: Converter,
    logger: &Arc<dyn CoreLog>,
) -> Result<Record, CoreError> {
    let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    let rec = converter.convert(&text, path)?;
    logger.debug(&format!(
        "[load_record] {} ({} bytes, {converter}): {} top-level keys",
        path.display(),
        text.len(),
        rec.len()
    ));
    Ok(rec)
}

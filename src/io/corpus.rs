//! Token corpus files.
//!
//! A corpus file is a flat list of token records, JSON or YAML:
//!
//! ```yaml
//! - { text_id: T1, column: A, position: 0, symbol_code: "ka" }
//! - { text_id: T1, column: A, position: 1, symbol_code: "|", is_boundary: true }
//! ```

use std::path::Path;

use tracing::debug;

use crate::core::errors::{IsthmusError, Result};
use crate::core::tokens::{SymbolStream, SymbolToken};

/// On-disk corpus encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    /// JSON array of token records
    Json,
    /// YAML sequence of token records
    Yaml,
}

impl CorpusFormat {
    /// Pick the encoding from a file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse and validate a corpus from text
pub fn parse_tokens(content: &str, format: CorpusFormat) -> Result<SymbolStream> {
    let tokens: Vec<SymbolToken> = match format {
        CorpusFormat::Json => serde_json::from_str(content)?,
        CorpusFormat::Yaml => serde_yaml::from_str(content)?,
    };
    SymbolStream::new(tokens)
}

/// Load and validate a corpus file
pub fn load_tokens(path: impl AsRef<Path>) -> Result<SymbolStream> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        IsthmusError::io(format!("Failed to read corpus file: {}", path.display()), e)
    })?;

    let stream = parse_tokens(&content, CorpusFormat::from_path(path))?;
    debug!(
        path = %path.display(),
        tokens = stream.len(),
        texts = stream.text_count(),
        "Loaded corpus"
    );
    Ok(stream)
}

/// Write a corpus as pretty JSON or YAML (by extension)
pub fn save_tokens(stream: &SymbolStream, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = match CorpusFormat::from_path(path) {
        CorpusFormat::Json => serde_json::to_string_pretty(stream)?,
        CorpusFormat::Yaml => serde_yaml::to_string(stream)?,
    };
    std::fs::write(path, content).map_err(|e| {
        IsthmusError::io(format!("Failed to write corpus file: {}", path.display()), e)
    })
}

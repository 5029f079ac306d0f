//! Reading import documents from disk.

use crate::error::{ImportError, ImportResult};
use crate::models::Mapping;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parse a JSON string into a top-level import document.
pub fn from_json(json: &str) -> ImportResult<Mapping> {
    into_mapping(serde_json::from_str(json)?)
}

/// Load an import document from a file (supports both plain JSON and gzip).
pub fn from_file(path: &Path) -> ImportResult<Mapping> {
    let read_err = |source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|file| BufReader::new(file).read_to_end(&mut bytes))
        .map_err(read_err)?;

    let value: Value = if bytes.starts_with(&[0x1f, 0x8b]) {
        let decoder = flate2::read::GzDecoder::new(bytes.as_slice());
        serde_json::from_reader(decoder)?
    } else {
        serde_json::from_slice(&bytes)?
    };
    into_mapping(value)
}

fn into_mapping(value: Value) -> ImportResult<Mapping> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ImportError::NotAnObject),
    }
}

//! Subcommand implementations.
//!
//! Each command reads its JSON input from a file (or stdin for `-`) and
//! writes its result to the given writer, so tests can capture the output.

pub mod config;
pub mod denormalize;
pub mod layout;
pub mod normalize;
pub mod rrule;
pub mod snap;

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};

/// Reads the input text from `path`, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> ClientResult<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .map_err(|e| ClientError::Input(format!("failed to read {}: {}", path.display(), e)))
}

/// Parses a single JSON value of type `T`.
pub(crate) fn parse_one<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
    serde_json::from_str(text).map_err(|e| ClientError::Input(e.to_string()))
}

/// Parses one `T` or an array of them.
pub(crate) fn parse_many<T: DeserializeOwned>(text: &str) -> ClientResult<Vec<T>> {
    let value: serde_json::Value = parse_one(text)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| ClientError::Input(format!("item {}: {}", i, e)))
        })
        .collect()
}

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> ClientResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

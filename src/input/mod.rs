pub mod csv;
pub mod json;

use anyhow::Result;
use crate::core::Game;
use std::path::Path;

/// Bytes inspected when sniffing the format
const SAMPLE_LEN: usize = 500;

/// Input format detection result
#[derive(Debug, Clone, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a game file from its contents
pub fn detect_format(data: &[u8]) -> InputFormat {
    if is_json(data) {
        return InputFormat::Json;
    }

    if is_csv(data) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

fn is_json(data: &[u8]) -> bool {
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{')
}

/// Leading text of `data`, cut back to a character boundary
fn sample_text(data: &[u8]) -> Option<&str> {
    let sample = &data[..data.len().min(SAMPLE_LEN)];
    match std::str::from_utf8(sample) {
        Ok(text) => Some(text),
        // A character split by the sample cut is not an encoding error
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&sample[..e.valid_up_to()]).ok(),
        Err(_) => None,
    }
}

fn is_csv(data: &[u8]) -> bool {
    // A header line naming the move column is enough; timing columns are optional
    sample_text(data)
        .and_then(|text| text.lines().next())
        .is_some_and(|header| {
            header
                .split(',')
                .map(|col| col.trim().to_lowercase())
                .any(|col| col == "san" || col == "move" || col == "notation")
        })
}

/// Game id taken from the file name
fn game_id(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load a game from a file, auto-detecting format
pub fn load_file(path: &str) -> Result<Game> {
    let data = std::fs::read(path)?;

    match detect_format(&data) {
        InputFormat::Json => json::parse_json(&data),
        InputFormat::Csv => csv::parse_csv(&data[..], game_id(path)),
        InputFormat::Unknown => anyhow::bail!("Unknown input format"),
    }
}

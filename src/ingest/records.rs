use crate::error::{Result, TwingraphError};
use serde_json::{Map, Number, Value as JsonValue};
use std::path::Path;

/// One decoded input record: a JSON/YAML document or a CSV row as an object.
pub type Record = JsonValue;

/// Input formats we can decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Yaml,
    Csv,
}

impl RecordFormat {
    /// Map a file extension (case-insensitive) to a format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Decode one file into records
///
/// JSON and YAML files yield a single record holding the whole document.
/// CSV files yield one object per row keyed by the header.
pub fn decode_file(path: &Path) -> Result<Vec<Record>> {
    let format = RecordFormat::from_path(path)
        .ok_or_else(|| TwingraphError::UnsupportedFormat(path.display().to_string()))?;

    let content = std::fs::read_to_string(path)?;
    let display = path.display().to_string();

    let records = match format {
        RecordFormat::Json => {
            let value: JsonValue = serde_json::from_str(&content)
                .map_err(|e| TwingraphError::Parse(format!("JSON parse error in {}: {}", display, e)))?;
            vec![value]
        }
        RecordFormat::Yaml => {
            let value: JsonValue = serde_yaml_ng::from_str(&content)
                .map_err(|e| TwingraphError::Parse(format!("YAML parse error in {}: {}", display, e)))?;
            vec![value]
        }
        RecordFormat::Csv => csv_records(&content)
            .map_err(|e| TwingraphError::Parse(format!("CSV parse error in {}: {}", display, e)))?,
    };

    log::debug!("Decoded {} records from {}", records.len(), display);
    Ok(records)
}

fn csv_records(content: &str) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let mut object = Map::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            object.insert(header.to_string(), csv_cell(cell));
        }
        records.push(JsonValue::Object(object));
    }

    Ok(records)
}

/// Type a CSV cell: empty → null, then integer, float, boolean, else string.
fn csv_cell(cell: &str) -> JsonValue {
    if cell.is_empty() {
        return JsonValue::Null;
    }
    if let Ok(n) = cell.parse::<i64>() {
        return JsonValue::Number(n.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return JsonValue::Number(n);
        }
    }
    match cell {
        "true" | "True" | "TRUE" => JsonValue::Bool(true),
        "false" | "False" | "FALSE" => JsonValue::Bool(false),
        _ => JsonValue::String(cell.to_string()),
    }
}

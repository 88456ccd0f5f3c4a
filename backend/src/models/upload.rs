//! Decoding of uploaded competitor-rank sheets.
//!
//! The spreadsheet itself is decoded by the client into an array of
//! header-keyed row objects (first sheet only). This module maps those rows
//! to [`RankRecord`]s using the sheet's Korean headers.

use serde_json::Value;

use super::rank::{json_kind, RankRecord};
use super::row::{decode_row, SHEET_KEYS};

/// Failure to decode an uploaded sheet.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Uploaded sheet must be an array of rows, got {0}")]
    NotATable(&'static str),

    #[error("Row {index} is not an object (got {kind})")]
    RowNotObject { index: usize, kind: &'static str },

    #[error("Uploaded sheet contains no rows")]
    Empty,
}

/// Decode every row of an uploaded sheet.
///
/// Individual cells are coerced (see [`super::row`]); only a structurally
/// malformed payload is rejected, so one bad upload never yields partial data.
pub fn decode_upload(rows: &Value) -> Result<Vec<RankRecord>, UploadError> {
    let rows = match rows {
        Value::Array(rows) => rows,
        other => return Err(UploadError::NotATable(json_kind(other))),
    };

    if rows.is_empty() {
        return Err(UploadError::Empty);
    }

    rows.iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Object(map) => Ok(decode_row(map, &SHEET_KEYS)),
            other => Err(UploadError::RowNotObject {
                index,
                kind: json_kind(other),
            }),
        })
        .collect()
}

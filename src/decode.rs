//! Bulk tabular payload decoding.
//!
//! The core never inspects the byte format itself; it consumes rows from a
//! decoder behind this seam. The in-tree decoder reads a JSON array of row
//! objects (the shape a sheet-to-JSON converter emits); a real spreadsheet
//! decoder plugs in behind the same trait.
use crate::error::{PipelineError, Result};
use serde_json::Value;

/// One decoded row: arbitrary string keys to arbitrary scalar values.
pub type Row = serde_json::Map<String, Value>;

/// Collaborator contract for turning an uploaded payload into rows.
pub trait TabularDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>>;
}

/// Decoder for JSON array-of-objects payloads.
#[derive(Debug, Default)]
pub struct JsonRowsDecoder;

impl TabularDecoder for JsonRowsDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Row>> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| PipelineError::decode(err.to_string()))?;
        let Value::Array(entries) = value else {
            return Err(PipelineError::decode("expected a JSON array of row objects"));
        };
        entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| match entry {
                Value::Object(row) => Ok(row),
                other => Err(PipelineError::decode(format!(
                    "row {idx} is not an object: {other}"
                ))),
            })
            .collect()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocmarkError, DocmarkResult};

/// Upper bound for `max_chunk_length`.
pub const MAX_CHUNK_LENGTH: i64 = 8192;

/// Chunking parameters forwarded to the uploader.
///
/// The engine never interprets these; it only guarantees they are in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ChunkSettings {
    max_chunk_length: u32,
    overlap_size: u32,
}

impl ChunkSettings {
    pub const DEFAULT: ChunkSettings = ChunkSettings {
        max_chunk_length: 4000,
        overlap_size: 200,
    };

    /// Create validated chunk settings.
    ///
    /// `max_chunk_length` must be in `1..=8192` and `overlap_size` in
    /// `0..=max_chunk_length`.
    pub fn new(max_chunk_length: i64, overlap_size: i64) -> DocmarkResult<Self> {
        if !(1..=MAX_CHUNK_LENGTH).contains(&max_chunk_length) {
            return Err(DocmarkError::configuration(
                "max_chunk_length",
                max_chunk_length,
                format!("must be between 1 and {}", MAX_CHUNK_LENGTH),
            ));
        }
        if !(0..=max_chunk_length).contains(&overlap_size) {
            return Err(DocmarkError::configuration(
                "overlap_size",
                overlap_size,
                format!("must be between 0 and {}", max_chunk_length),
            ));
        }

        Ok(Self {
            max_chunk_length: max_chunk_length as u32,
            overlap_size: overlap_size as u32,
        })
    }

    pub fn max_chunk_length(&self) -> u32 {
        self.max_chunk_length
    }

    pub fn overlap_size(&self) -> u32 {
        self.overlap_size
    }

    /// Build from a raw mapping. Missing keys take their default.
    pub fn from_value(value: &Value) -> DocmarkResult<Self> {
        let Value::Object(map) = value else {
            return Err(DocmarkError::configuration(
                "chunk_settings",
                value,
                "must be a mapping",
            ));
        };

        if let Some(key) = map
            .keys()
            .find(|k| k.as_str() != "max_chunk_length" && k.as_str() != "overlap_size")
        {
            return Err(DocmarkError::configuration(
                key.as_str(),
                &map[key],
                "is not a recognized chunk option",
            ));
        }

        let max = int_field(map, "max_chunk_length", Self::DEFAULT.max_chunk_length)?;
        let overlap = int_field(map, "overlap_size", Self::DEFAULT.overlap_size)?;
        Self::new(max, overlap)
    }

    /// Serializable map projection.
    pub fn as_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("max_chunk_length".into(), self.max_chunk_length.into());
        map.insert("overlap_size".into(), self.overlap_size.into());
        map
    }
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<Value> for ChunkSettings {
    type Error = DocmarkError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

fn int_field(map: &Map<String, Value>, field: &str, default: u32) -> DocmarkResult<i64> {
    match map.get(field) {
        None => Ok(default as i64),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| DocmarkError::configuration(field, value, "must be an integer")),
    }
}

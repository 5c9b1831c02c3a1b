// Result encoding for store entries
// Author: kelexine (https://github.com/kelexine)

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Encode a query result into store bytes
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode store bytes back into a query result
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

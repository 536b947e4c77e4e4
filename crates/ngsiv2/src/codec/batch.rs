//! JSON encoding/decoding of batch updates and the API entry point document.

use crate::error::{DecodeError, EncodeError};
use crate::model::{ApiResources, BatchUpdate};

/// Encodes a batch as `{"actionType": ..., "entities": [...]}`.
pub fn encode_batch_update(batch: &BatchUpdate) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(batch)?)
}

pub fn decode_batch_update(input: &[u8]) -> Result<BatchUpdate, DecodeError> {
    Ok(serde_json::from_slice(input)?)
}

/// Decodes the `GET /v2` response body.
pub fn decode_api_resources(input: &[u8]) -> Result<ApiResources, DecodeError> {
    Ok(serde_json::from_slice(input)?)
}

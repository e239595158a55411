//! Wire data exchanged with the conversion service.
//!
//! - `result` - terminal payload of a completed job
//! - `voice` - model registry listing and clone-data files
//! - `request` - bodies of the two job submission endpoints

mod request;
mod result;
mod voice;

pub use request::{BatchRequest, UploadFile, UploadRequest, UploadRequestError};
pub use result::{ConversionOutcome, ItemStatus, ResultSummary};
pub use voice::{CloneData, ModelList, VoiceInfo, VoiceModel};

use serde::{Deserialize, Deserializer};

/// Helper to deserialize nullable strings as empty string
/// Handles both missing fields and explicit null values
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

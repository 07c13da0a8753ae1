use crate::error::UcanError;
use base64::Engine;
use serde::Serialize;

/// Helper trait to encode the header and payload structs as unpadded
/// URL-safe base64 JSON, the form they take as token segments
pub trait Base64Encode: Serialize {
    fn jwt_base64_encode(&self) -> Result<String, UcanError> {
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?))
    }
}

impl<T> Base64Encode for T where T: Serialize {}

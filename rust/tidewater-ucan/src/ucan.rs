use crate::{
    crypto::{did::DidCodec, verify_signature},
    error::UcanError,
    serde::Base64Encode,
    time::now,
};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

/// Protocol version advertised in the `uav` header field. This is pinned
/// to the value the deployed services accept, which lags the conceptual
/// protocol revision; treat it as configuration.
pub const UCAN_VERSION: &str = "1.0.0";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct UcanHeader {
    pub alg: String,
    pub typ: String,
    pub uav: String,
}

/// The scope a token's potency applies to: either the unrestricted
/// wildcard, or a structured descriptor understood by the service that
/// consumes the token. Serialized as the bare string `"*"` or the
/// structured value verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    Wildcard,
    Scoped(Value),
}

impl Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Resource::Wildcard => serializer.serialize_str("*"),
            Resource::Scoped(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(string) if string == "*" => Resource::Wildcard,
            other => Resource::Scoped(other),
        })
    }
}

// Fields are declared in their canonical (alphabetical) wire order; serde
// emits them as declared.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct UcanPayload {
    pub aud: String,
    pub exp: u64,
    pub fct: Vec<Value>,
    pub iss: String,
    pub nbf: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prf: Option<String>,
    pub ptc: String,
    pub rsc: Resource,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Ucan {
    header: UcanHeader,
    payload: UcanPayload,
    signed_data: Vec<u8>,
    signature: Option<String>,
}

impl Ucan {
    pub fn new(
        header: UcanHeader,
        payload: UcanPayload,
        signed_data: Vec<u8>,
        signature: Option<String>,
    ) -> Self {
        Ucan {
            signed_data,
            header,
            payload,
            signature,
        }
    }

    /// Validate that the signed data was signed by the stated issuer.
    ///
    /// A missing signature, a signature segment that is not decodable
    /// base64, or a signature that does not verify all yield `false`; a
    /// structurally malformed issuer identifier is an error.
    pub fn check_signature(&self, did_codec: &DidCodec) -> Result<bool, UcanError> {
        let signature = match &self.signature {
            Some(signature) => signature,
            None => return Ok(false),
        };

        let signature_bytes = match base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature)
        {
            Ok(bytes) => bytes,
            Err(_) => return Ok(false),
        };

        let (public_key, key_type) = did_codec.decode(&self.payload.iss)?;

        Ok(verify_signature(
            &self.signed_data,
            &signature_bytes,
            &public_key,
            key_type,
        ))
    }

    /// Produce the canonical three-segment serialization of the token,
    /// suitable for transferring in a header field. The signature segment
    /// is empty for unsigned tokens.
    pub fn encode(&self) -> Result<String, UcanError> {
        let header = self.header.jwt_base64_encode()?;
        let payload = self.payload.jwt_base64_encode()?;
        let signature = self.signature.as_deref().unwrap_or_default();

        Ok(format!("{header}.{payload}.{signature}"))
    }

    /// Returns true if the token's expiry has passed. The boundary is
    /// inclusive: a token expiring at exactly `now` is already expired.
    pub fn is_expired(&self, now_time: Option<u64>) -> bool {
        self.payload.exp <= now_time.unwrap_or_else(now)
    }

    /// Returns true if the not-before ("nbf") time is still in the future
    pub fn is_too_early(&self, now_time: Option<u64>) -> bool {
        self.payload.nbf > now_time.unwrap_or_else(now)
    }

    /// Raw bytes of signed data for this token
    pub fn signed_data(&self) -> &[u8] {
        &self.signed_data
    }

    /// The opaque base64url signature segment, if the token is signed
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn algorithm(&self) -> &str {
        &self.header.alg
    }

    pub fn version(&self) -> &str {
        &self.header.uav
    }

    pub fn issuer(&self) -> &str {
        &self.payload.iss
    }

    pub fn audience(&self) -> &str {
        &self.payload.aud
    }

    /// The encoded token this one delegates from, if any
    pub fn proof(&self) -> Option<&str> {
        self.payload.prf.as_deref()
    }

    pub fn expires_at(&self) -> u64 {
        self.payload.exp
    }

    pub fn not_before(&self) -> u64 {
        self.payload.nbf
    }

    pub fn potency(&self) -> &str {
        &self.payload.ptc
    }

    pub fn resource(&self) -> &Resource {
        &self.payload.rsc
    }

    pub fn facts(&self) -> &Vec<Value> {
        &self.payload.fct
    }

    /// Parse an encoded token, reporting structural failures at the given
    /// proof depth. Depth 0 is the outermost token; the chain walkers in
    /// [`crate::chain`] parse proofs at increasing depths.
    pub(crate) fn parse_at_depth(ucan_token: &str, depth: usize) -> Result<Self, UcanError> {
        let parts: Vec<&str> = ucan_token.split('.').collect();

        if parts.len() != 3 {
            return Err(UcanError::MalformedToken {
                depth,
                reason: format!("expected 3 segments, got {}", parts.len()),
            });
        }

        let header_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(parts[0])
            .map_err(|error| UcanError::MalformedToken {
                depth,
                reason: format!("header segment is not decodable base64: {error}"),
            })?;

        let header: UcanHeader =
            serde_json::from_slice(&header_bytes).map_err(|error| UcanError::MalformedToken {
                depth,
                reason: format!("header segment is not a well-formed header: {error}"),
            })?;

        let payload_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|error| UcanError::MalformedToken {
                depth,
                reason: format!("payload segment is not decodable base64: {error}"),
            })?;

        let payload: UcanPayload =
            serde_json::from_slice(&payload_bytes).map_err(|error| UcanError::MalformedToken {
                depth,
                reason: format!("payload segment is not a well-formed payload: {error}"),
            })?;

        let signature = match parts[2] {
            "" => None,
            segment => Some(segment.to_owned()),
        };

        let signed_data = format!("{}.{}", parts[0], parts[1]).into_bytes();

        Ok(Ucan::new(header, payload, signed_data, signature))
    }
}

/// Deserialize an encoded token string reference into a [Ucan]
impl<'a> TryFrom<&'a str> for Ucan {
    type Error = UcanError;

    fn try_from(ucan_token: &str) -> Result<Self, Self::Error> {
        Ucan::from_str(ucan_token)
    }
}

/// Deserialize an encoded token string into a [Ucan]
impl TryFrom<String> for Ucan {
    type Error = UcanError;

    fn try_from(ucan_token: String) -> Result<Self, Self::Error> {
        Ucan::from_str(ucan_token.as_str())
    }
}

/// Deserialize an encoded token string reference into a [Ucan]
impl FromStr for Ucan {
    type Err = UcanError;

    fn from_str(ucan_token: &str) -> Result<Self, Self::Err> {
        Ucan::parse_at_depth(ucan_token, 0)
    }
}

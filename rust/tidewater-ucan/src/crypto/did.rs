use crate::{crypto::KeyType, error::UcanError};
use std::collections::BTreeMap;

pub type DidPrefix = &'static [u8];
pub type KeyTypeSlice = [(DidPrefix, KeyType)];

pub const DID_KEY_PREFIX: &str = "did:key:z";

// See: https://github.com/multiformats/multicodec/blob/master/table.csv
pub const ED25519_MAGIC_BYTES: DidPrefix = &[0xed, 0x01];
pub const RSA_MAGIC_BYTES: DidPrefix = &[0x85, 0x24];
pub const BLS12381_MAGIC_BYTES: DidPrefix = &[0xea, 0x01];

/// The full prefix registry; pass a subset to [DidCodec::new] to restrict
/// the key types accepted by a codec
pub const SUPPORTED_KEY_TYPES: &KeyTypeSlice = &[
    (ED25519_MAGIC_BYTES, KeyType::Ed25519),
    (RSA_MAGIC_BYTES, KeyType::Rsa),
    (BLS12381_MAGIC_BYTES, KeyType::Bls12381),
];

/// Converts between raw public keys and the `did:key` identifiers used as
/// token issuers and audiences. An identifier is the method prefix
/// followed by the base58btc encoding of two algorithm-specific magic
/// bytes and the raw public key; the magic bytes multiplex key types
/// within the one encoding.
pub struct DidCodec {
    prefixes: BTreeMap<DidPrefix, KeyType>,
}

impl DidCodec {
    pub fn new(key_type_slice: &KeyTypeSlice) -> Self {
        let mut prefixes = BTreeMap::new();

        for (prefix, key_type) in key_type_slice {
            prefixes.insert(*prefix, *key_type);
        }

        DidCodec { prefixes }
    }

    /// Derive the identifier for a public key of the given [KeyType]
    pub fn encode(&self, public_key: &[u8], key_type: KeyType) -> Result<String, UcanError> {
        let prefix = self
            .prefixes
            .iter()
            .find_map(|(prefix, registered)| (*registered == key_type).then_some(*prefix))
            .ok_or(UcanError::UnsupportedAlgorithm(key_type))?;

        let bytes = [prefix, public_key].concat();

        Ok(format!(
            "{}{}",
            DID_KEY_PREFIX,
            bs58::encode(bytes).into_string()
        ))
    }

    /// Recover the raw public key and [KeyType] from an identifier
    pub fn decode(&self, did: &str) -> Result<(Vec<u8>, KeyType), UcanError> {
        if !did.starts_with(DID_KEY_PREFIX) {
            return Err(UcanError::MalformedIdentifier(format!(
                "expected a '{DID_KEY_PREFIX}' identifier, got '{did}'"
            )));
        }

        let did_bytes = bs58::decode(&did[DID_KEY_PREFIX.len()..])
            .into_vec()
            .map_err(|error| UcanError::MalformedIdentifier(error.to_string()))?;

        if did_bytes.len() < 2 {
            return Err(UcanError::MalformedIdentifier(
                "identifier is too short to carry magic bytes".into(),
            ));
        }

        let magic_bytes = &did_bytes[0..2];

        match self.prefixes.get(magic_bytes) {
            Some(key_type) => Ok((Vec::from(&did_bytes[2..]), *key_type)),
            None => Err(UcanError::MalformedIdentifier(format!(
                "unrecognized magic bytes: {magic_bytes:?}"
            ))),
        }
    }
}

impl Default for DidCodec {
    fn default() -> Self {
        DidCodec::new(SUPPORTED_KEY_TYPES)
    }
}

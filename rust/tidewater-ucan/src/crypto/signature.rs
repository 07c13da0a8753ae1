use ed25519_zebra::{Signature as Ed25519Signature, VerificationKey as Ed25519PublicKey};
use rsa::{pkcs1::DecodeRsaPublicKey, Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use strum_macros::{Display, EnumString};
use tracing::warn;

/// The closed set of key algorithms that may appear in a Tidewater
/// identifier. Every variant has registered identifier magic bytes (see
/// [`crate::crypto::did`]); only some have a signature verifier and a JWT
/// algorithm label. BLS12-381 keys are identifier-only for now.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, Ord, PartialEq, PartialOrd)]
pub enum KeyType {
    #[strum(serialize = "ed25519")]
    Ed25519,
    #[strum(serialize = "rsa")]
    Rsa,
    #[strum(serialize = "bls12-381")]
    Bls12381,
}

impl KeyType {
    /// The signature algorithm label carried in the header of tokens
    /// issued with this kind of key, per RFC 7518 / RFC 8037
    pub fn jwt_algorithm(&self) -> Option<&'static str> {
        match self {
            KeyType::Ed25519 => Some("EdDSA"),
            KeyType::Rsa => Some("RS256"),
            KeyType::Bls12381 => None,
        }
    }
}

/// Verify an alleged signature over `payload` against a raw public key of
/// the given [KeyType].
///
/// This fails closed: a key type with no registered verifier, a public
/// key that does not parse, or a signature of the wrong shape all yield
/// `false`, never a fault.
pub fn verify_signature(
    payload: &[u8],
    signature: &[u8],
    public_key: &[u8],
    key_type: KeyType,
) -> bool {
    match key_type {
        KeyType::Ed25519 => verify_ed25519(payload, signature, public_key),
        KeyType::Rsa => verify_rsa(payload, signature, public_key),
        other => {
            warn!("No signature verifier registered for '{}' keys", other);
            false
        }
    }
}

fn verify_ed25519(payload: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let public_key = match Ed25519PublicKey::try_from(public_key) {
        Ok(public_key) => public_key,
        Err(_) => return false,
    };

    let signature = match Ed25519Signature::try_from(signature) {
        Ok(signature) => signature,
        Err(_) => return false,
    };

    public_key.verify(&signature, payload).is_ok()
}

fn verify_rsa(payload: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    // NOTE: identifiers carry RSA public keys in PKCS#1 DER form
    let public_key = match RsaPublicKey::from_pkcs1_der(public_key) {
        Ok(public_key) => public_key,
        Err(_) => return false,
    };

    let hashed = Sha256::digest(payload);

    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), hashed.as_ref(), signature)
        .is_ok()
}

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ed25519_zebra::{SigningKey as Ed25519PrivateKey, VerificationKey as Ed25519PublicKey};

use tidewater_ucan::crypto::{KeyMaterial, KeyType};

/// Produce a unique [Ed25519KeyMaterial] for general purpose use cases
pub fn generate_ed25519_key() -> Ed25519KeyMaterial {
    let private_key = Ed25519PrivateKey::new(rand::thread_rng());
    let public_key = Ed25519PublicKey::from(&private_key);
    Ed25519KeyMaterial(public_key, Some(private_key))
}

/// Restore an [Ed25519KeyMaterial] from raw private key bytes, for
/// example ones read back from platform key storage
pub fn ed25519_key_from_bytes(private_key_bytes: &[u8]) -> Result<Ed25519KeyMaterial> {
    let private_key = Ed25519PrivateKey::try_from(private_key_bytes)?;
    let public_key = Ed25519PublicKey::from(&private_key);
    Ok(Ed25519KeyMaterial(public_key, Some(private_key)))
}

#[derive(Clone)]
pub struct Ed25519KeyMaterial(pub Ed25519PublicKey, pub Option<Ed25519PrivateKey>);

#[async_trait]
impl KeyMaterial for Ed25519KeyMaterial {
    fn key_type(&self) -> KeyType {
        KeyType::Ed25519
    }

    async fn public_key(&self) -> Result<Vec<u8>> {
        Ok(self.0.as_ref().to_vec())
    }

    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        match self.1 {
            Some(private_key) => {
                let signature = private_key.sign(payload);
                let bytes: [u8; 64] = signature.into();
                Ok(bytes.to_vec())
            }
            None => Err(anyhow!("No private key; cannot sign data")),
        }
    }
}

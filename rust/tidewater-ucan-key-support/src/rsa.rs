use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rsa::{pkcs1::EncodeRsaPublicKey, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use tidewater_ucan::crypto::{KeyMaterial, KeyType};

const RSA_KEY_SIZE: usize = 2048;

/// Produce a unique [RsaKeyMaterial]; prefer restoring a key that is held
/// by platform secure storage when one is available
pub fn generate_rsa_key() -> Result<RsaKeyMaterial> {
    let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), RSA_KEY_SIZE)?;
    let public_key = RsaPublicKey::from(&private_key);
    Ok(RsaKeyMaterial(public_key, Some(private_key)))
}

#[derive(Clone)]
pub struct RsaKeyMaterial(pub RsaPublicKey, pub Option<RsaPrivateKey>);

#[async_trait]
impl KeyMaterial for RsaKeyMaterial {
    fn key_type(&self) -> KeyType {
        KeyType::Rsa
    }

    async fn public_key(&self) -> Result<Vec<u8>> {
        // NOTE: identifiers embed RSA public keys in their PKCS#1 DER form
        let document = self.0.to_pkcs1_der().map_err(|error| anyhow!(error))?;
        Ok(document.as_bytes().to_vec())
    }

    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let hashed = Sha256::digest(payload);

        match &self.1 {
            Some(private_key) => {
                let signature = private_key.sign(Pkcs1v15Sign::new::<Sha256>(), hashed.as_ref())?;
                Ok(signature)
            }
            None => Err(anyhow!("No private key; cannot sign data")),
        }
    }
}

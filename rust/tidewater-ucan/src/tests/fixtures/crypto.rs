use crate::crypto::{KeyMaterial, KeyType};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ed25519_zebra::{SigningKey as Ed25519PrivateKey, VerificationKey as Ed25519PublicKey};

pub struct TestKeypair(pub Ed25519PublicKey, pub Option<Ed25519PrivateKey>);

#[async_trait]
impl KeyMaterial for TestKeypair {
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

pub fn generate_keypair() -> TestKeypair {
    let private_key = Ed25519PrivateKey::new(rand::thread_rng());
    let public_key = Ed25519PublicKey::from(&private_key);
    TestKeypair(public_key, Some(private_key))
}

/// A key whose algorithm the verifier has no support for; building a
/// token with it must fail closed
pub struct UnverifiableKeypair;

#[async_trait]
impl KeyMaterial for UnverifiableKeypair {
    fn key_type(&self) -> KeyType {
        KeyType::Bls12381
    }

    async fn public_key(&self) -> Result<Vec<u8>> {
        Ok(vec![0u8; 48])
    }

    async fn sign(&self, _payload: &[u8]) -> Result<Vec<u8>> {
        Err(anyhow!("No signature scheme available"))
    }
}

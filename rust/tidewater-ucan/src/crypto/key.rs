use crate::crypto::{did::DidCodec, KeyType};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// This trait must be implemented by a struct that encapsulates
/// cryptographic keypair data. It represents the minimum required
/// capability for producing a signed token: reporting the key algorithm,
/// exposing the raw public key, and signing byte strings. Verification is
/// deliberately not part of the contract; it is performed against the
/// public key recovered from the issuer identifier (see
/// [`crate::crypto::verify_signature`]).
#[async_trait]
pub trait KeyMaterial: Send + Sync {
    /// The algorithm tag for this key; determines both the identifier
    /// magic bytes and the signature scheme
    fn key_type(&self) -> KeyType;

    /// The raw public key bytes as they are embedded in this key's
    /// identifier
    async fn public_key(&self) -> Result<Vec<u8>>;

    /// Sign some data with this key
    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>>;

    /// The `did:key` identifier that other parties can use to verify
    /// signatures produced by this key
    async fn get_did(&self) -> Result<String> {
        Ok(DidCodec::default().encode(&self.public_key().await?, self.key_type())?)
    }
}

#[async_trait]
impl KeyMaterial for Box<dyn KeyMaterial> {
    fn key_type(&self) -> KeyType {
        self.as_ref().key_type()
    }

    async fn public_key(&self) -> Result<Vec<u8>> {
        self.as_ref().public_key().await
    }

    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self.as_ref().sign(payload).await
    }

    async fn get_did(&self) -> Result<String> {
        self.as_ref().get_did().await
    }
}

#[async_trait]
impl<K> KeyMaterial for Arc<K>
where
    K: KeyMaterial,
{
    fn key_type(&self) -> KeyType {
        (**self).key_type()
    }

    async fn public_key(&self) -> Result<Vec<u8>> {
        (**self).public_key().await
    }

    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        (**self).sign(payload).await
    }

    async fn get_did(&self) -> Result<String> {
        (**self).get_did().await
    }
}

use super::TestKeypair;
use crate::crypto::KeyMaterial;
use base64::Engine;
use ed25519_zebra::{SigningKey as Ed25519PrivateKey, VerificationKey as Ed25519PublicKey};

pub struct Identities {
    pub alice_key: TestKeypair,
    pub bob_key: TestKeypair,
    pub mallory_key: TestKeypair,

    pub alice_did: String,
    pub bob_did: String,
    pub mallory_did: String,
}

/// An adaptation of the fixtures used in the canonical ts-ucan repo
/// See: https://github.com/ucan-wg/ts-ucan/blob/main/tests/fixtures.ts
impl Identities {
    pub async fn new() -> Self {
        let alice_key = keypair_from_base64("U+bzp2GaFQHso587iSFWPSeCzbSfn/CbNHEz7ilKRZ1UQMmMS7qq4UhTzKn3X9Nj/4xgrwa+UqhMOeo4Ki8JUw==");
        let bob_key = keypair_from_base64("G4+QCX1b3a45IzQsQd4gFMMe0UB1UOx9bCsh8uOiKLER69eAvVXvc8P2yc4Iig42Bv7JD2zJxhyFALyTKBHipg==");
        let mallory_key = keypair_from_base64("LR9AL2MYkMARuvmV3MJV8sKvbSOdBtpggFCW8K62oZDR6UViSXdSV/dDcD8S9xVjS61vh62JITx7qmLgfQUSZQ==");

        Identities {
            alice_did: alice_key.get_did().await.unwrap(),
            bob_did: bob_key.get_did().await.unwrap(),
            mallory_did: mallory_key.get_did().await.unwrap(),

            alice_key,
            bob_key,
            mallory_key,
        }
    }

    #[allow(dead_code)]
    pub fn name_for(&self, did: String) -> String {
        match did {
            _ if did == self.alice_did => "alice".into(),
            _ if did == self.bob_did => "bob".into(),
            _ if did == self.mallory_did => "mallory".into(),
            _ => did,
        }
    }
}

/// NOTE: tweetnacl secret keys concat the public keys, so we only care
/// about the first 32 bytes
fn keypair_from_base64(encoded: &str) -> TestKeypair {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[0..32]);

    let private_key = Ed25519PrivateKey::from(seed);
    let public_key = Ed25519PublicKey::from(&private_key);

    TestKeypair(public_key, Some(private_key))
}

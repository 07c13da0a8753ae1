use crate::{
    crypto::KeyMaterial,
    serde::Base64Encode,
    tests::fixtures::TestKeypair,
    ucan::{UcanHeader, UcanPayload, UCAN_VERSION},
};
use base64::Engine;

/// Assemble and sign a token directly from payload parts, bypassing the
/// builder; lets tests craft tokens the builder would refuse to produce
pub async fn encode_token_with_payload(issuer: &TestKeypair, payload: UcanPayload) -> String {
    let header = UcanHeader {
        alg: "EdDSA".into(),
        typ: "JWT".into(),
        uav: UCAN_VERSION.into(),
    };

    let signed_data = format!(
        "{}.{}",
        header.jwt_base64_encode().unwrap(),
        payload.jwt_base64_encode().unwrap()
    );

    let signature = issuer.sign(signed_data.as_bytes()).await.unwrap();

    format!(
        "{signed_data}.{}",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Flip one character in the middle of a token's signature segment,
/// leaving it decodable but no longer matching the signed data
pub fn tamper_signature(encoded_token: &str) -> String {
    let (front, signature) = encoded_token.rsplit_once('.').unwrap();

    let mut bytes = signature.as_bytes().to_vec();
    bytes[10] = if bytes[10] == b'A' { b'B' } else { b'A' };

    format!("{front}.{}", String::from_utf8(bytes).unwrap())
}

use crate::{
    crypto::KeyMaterial,
    error::UcanError,
    serde::Base64Encode,
    time::now,
    ucan::{Resource, Ucan, UcanHeader, UcanPayload, UCAN_VERSION},
};
use anyhow::{anyhow, Result};
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Seconds of clock skew tolerated between issuing and verifying hosts;
/// a freshly built token's window opens this far in the past.
pub const NBF_CLOCK_SKEW: u64 = 60;

/// Expiry window, in seconds, applied when a builder specifies none
pub const DEFAULT_LIFETIME: u64 = 30;

/// Potency granted when a builder specifies none
pub const DEFAULT_POTENCY: &str = "APPEND";

/// A signable is a token that has all the state it needs in order to be
/// signed, but has not yet been signed; it can be finalized with or
/// without a signature.
pub struct Signable<'a, K>
where
    K: KeyMaterial,
{
    pub issuer: &'a K,
    pub issuer_did: Option<String>,
    pub audience: String,

    pub potency: String,
    pub resource: Option<Resource>,

    pub lifetime: u64,
    pub expiration: Option<u64>,
    pub not_before: Option<u64>,

    pub facts: Vec<Value>,
    pub proof: Option<String>,
}

impl<'a, K> Signable<'a, K>
where
    K: KeyMaterial,
{
    /// The header field components of the token JWT
    pub fn ucan_header(&self) -> Result<UcanHeader, UcanError> {
        let key_type = self.issuer.key_type();
        let algorithm = key_type
            .jwt_algorithm()
            .ok_or(UcanError::UnsupportedAlgorithm(key_type))?;

        Ok(UcanHeader {
            alg: algorithm.into(),
            typ: "JWT".into(),
            uav: UCAN_VERSION.into(),
        })
    }

    /// The payload field components of the token JWT. When a proof is
    /// present its window and resource constrain the result: the validity
    /// window is the intersection of the requested window and the
    /// proof's, and an unspecified resource is inherited from the proof.
    pub async fn ucan_payload(&self) -> Result<UcanPayload> {
        let current_time = now();

        let mut expiration = self
            .expiration
            .unwrap_or(current_time + self.lifetime);
        let mut not_before = self
            .not_before
            .unwrap_or_else(|| current_time.saturating_sub(NBF_CLOCK_SKEW));

        let mut resource = self.resource.clone();

        if let Some(proof_token) = &self.proof {
            let proof = Ucan::parse_at_depth(proof_token, 1)?;

            expiration = expiration.min(proof.expires_at());
            not_before = not_before.max(proof.not_before());

            if resource.is_none() {
                resource = Some(proof.resource().clone());
            }
        }

        if expiration < not_before {
            return Err(anyhow!(
                "the requested validity window does not intersect the proof's window"
            ));
        }

        let issuer_did = match &self.issuer_did {
            Some(did) => did.clone(),
            None => self.issuer.get_did().await?,
        };

        Ok(UcanPayload {
            aud: self.audience.clone(),
            exp: expiration,
            fct: self.facts.clone(),
            iss: issuer_did,
            nbf: not_before,
            prf: self.proof.clone(),
            ptc: self.potency.clone(),
            rsc: resource.unwrap_or(Resource::Wildcard),
        })
    }

    /// Produce a signed [Ucan]: the issuer key signs the literal
    /// `base64url(header) + "." + base64url(payload)` string, which is
    /// also retained as the token's signed data
    pub async fn sign(&self) -> Result<Ucan> {
        let (header, payload, signed_data) = self.assemble().await?;

        let signature_bytes = self.issuer.sign(&signed_data).await?;
        let signature =
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature_bytes);

        Ok(Ucan::new(header, payload, signed_data, Some(signature)))
    }

    /// Produce the same token [Signable::sign] would, with the signature
    /// left absent; its wire form carries an empty third segment
    pub async fn unsigned(&self) -> Result<Ucan> {
        let (header, payload, signed_data) = self.assemble().await?;

        Ok(Ucan::new(header, payload, signed_data, None))
    }

    async fn assemble(&self) -> Result<(UcanHeader, UcanPayload, Vec<u8>)> {
        let header = self.ucan_header()?;
        let payload = self.ucan_payload().await?;

        let header_base64 = header.jwt_base64_encode()?;
        let payload_base64 = payload.jwt_base64_encode()?;
        let signed_data = format!("{header_base64}.{payload_base64}").into_bytes();

        Ok((header, payload, signed_data))
    }
}

/// A builder API for tokens
#[derive(Clone)]
pub struct UcanBuilder<'a, K>
where
    K: KeyMaterial,
{
    issuer: Option<&'a K>,
    issuer_did: Option<String>,
    audience: Option<String>,

    potency: Option<String>,
    resource: Option<Resource>,

    lifetime: Option<u64>,
    expiration: Option<u64>,
    not_before: Option<u64>,

    facts: Vec<Value>,
    proof: Option<String>,
}

impl<'a, K> Default for UcanBuilder<'a, K>
where
    K: KeyMaterial,
{
    /// Create an empty builder. Before finalising the builder, you need
    /// to at least call `issued_by` and `for_audience`. To finalise, call
    /// its `build` method and then sign the result.
    fn default() -> Self {
        UcanBuilder {
            issuer: None,
            issuer_did: None,
            audience: None,

            potency: None,
            resource: None,

            lifetime: None,
            expiration: None,
            not_before: None,

            facts: Vec::new(),
            proof: None,
        }
    }
}

impl<'a, K> UcanBuilder<'a, K>
where
    K: KeyMaterial,
{
    /// The token must be signed with the private key of the issuer to be
    /// considered valid.
    pub fn issued_by(mut self, issuer: &'a K) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Embed an explicit issuer identifier in the payload instead of the
    /// one derived from the signing key. The token is still signed by the
    /// key given to [UcanBuilder::issued_by], so the result only
    /// validates when the two refer to the same key.
    pub fn with_issuer(mut self, issuer_did: &str) -> Self {
        self.issuer_did = Some(String::from(issuer_did));
        self
    }

    /// This is the identity the token transfers rights to. It could be
    /// the identifier of a service this token is posted to, or of a peer
    /// that will use it as the proof of a further delegation.
    pub fn for_audience(mut self, audience: &str) -> Self {
        self.audience = Some(String::from(audience));
        self
    }

    /// The number of seconds into the future (relative to when the token
    /// is finalized) to set the expiration. Ignored if an explicit
    /// expiration is set.
    pub fn with_lifetime(mut self, seconds: u64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Set the POSIX timestamp (in seconds) at which the token should
    /// expire. Setting this value overrides a configured lifetime.
    pub fn with_expiration(mut self, timestamp: u64) -> Self {
        self.expiration = Some(timestamp);
        self
    }

    /// Set the POSIX timestamp (in seconds) of when the token becomes
    /// active, instead of the default clock-skew allowance before now.
    pub fn not_before(mut self, timestamp: u64) -> Self {
        self.not_before = Some(timestamp);
        self
    }

    /// The capability level this token grants over its resource
    pub fn with_potency(mut self, potency: &str) -> Self {
        self.potency = Some(String::from(potency));
        self
    }

    /// The resource the granted potency applies to. When left unset, the
    /// resource is inherited from the proof if one is given, and is
    /// otherwise the unrestricted wildcard.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Add a fact to this token. Facts are opaque to the protocol and
    /// carried in order.
    pub fn with_fact<T: Serialize>(mut self, fact: T) -> Self {
        match serde_json::to_value(fact) {
            Ok(value) => self.facts.push(value),
            Err(error) => warn!("Could not add fact to token: {}", error),
        }
        self
    }

    /// Reference an already-encoded token as the proof this one delegates
    /// from. Note that the proof's audience must match this token's
    /// issuer or else the chain will not validate.
    pub fn witnessed_by(mut self, proof_token: &str) -> Self {
        self.proof = Some(String::from(proof_token));
        self
    }

    pub fn build(self) -> Result<Signable<'a, K>> {
        match &self.issuer {
            Some(issuer) => match &self.audience {
                Some(audience) => Ok(Signable {
                    issuer,
                    issuer_did: self.issuer_did.clone(),
                    audience: audience.clone(),
                    potency: self
                        .potency
                        .clone()
                        .unwrap_or_else(|| DEFAULT_POTENCY.into()),
                    resource: self.resource.clone(),
                    lifetime: self.lifetime.unwrap_or(DEFAULT_LIFETIME),
                    expiration: self.expiration,
                    not_before: self.not_before,
                    facts: self.facts.clone(),
                    proof: self.proof.clone(),
                }),
                None => Err(anyhow!("Missing audience")),
            },
            None => Err(anyhow!("Missing issuer")),
        }
    }
}

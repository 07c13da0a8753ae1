use crate::{crypto::did::DidCodec, error::UcanError, ucan::Ucan};
use std::collections::BTreeSet;
use tracing::trace;

/// Upper bound on the number of proof hops the chain walkers will follow.
/// Chains are attacker-supplied input and nothing in the wire format
/// bounds their length, so the walk must.
pub const MAX_PROOF_DEPTH: usize = 32;

/// Terminal result of validating a delegation chain. Structural failures
/// parsing the chain are surfaced as [UcanError] instead; every expected
/// way for a well-formed chain to be untrustworthy is an [Invalidity].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Validation {
    Valid,
    Invalid(Invalidity),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

/// Why a chain failed to validate. Depths count proof hops from the
/// outermost token, which is depth 0.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invalidity {
    /// The token at this depth carries no signature
    SignatureMissing { depth: usize },
    /// The signature at this depth does not verify against the issuer's
    /// public key
    SignatureMismatch { depth: usize },
    /// The proof at this depth was not delegated to the issuer of the
    /// token it witnesses
    BrokenChain { depth: usize },
    /// The same encoded proof appeared twice along the chain
    CircularProof { depth: usize },
    /// The chain extends beyond [MAX_PROOF_DEPTH]
    ChainTooDeep { depth: usize },
}

/// Validate the signature and delegation chain of an encoded token.
///
/// Each level's signature must verify against the public key recovered
/// from its issuer identifier, and each proof must have been delegated to
/// the issuer of the token that references it. Expiry is deliberately not
/// checked here: a chain can be [Validation::Valid] and still be past its
/// window, and callers are expected to also consult [Ucan::is_expired].
pub fn validate(encoded_token: &str, did_codec: &DidCodec) -> Result<Validation, UcanError> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut current = encoded_token.to_owned();
    let mut delegate_issuer: Option<String> = None;
    let mut depth = 0;

    loop {
        let ucan = Ucan::parse_at_depth(&current, depth)?;

        if let Some(issuer) = &delegate_issuer {
            if ucan.audience() != issuer {
                return Ok(Validation::Invalid(Invalidity::BrokenChain { depth }));
            }
        }

        if ucan.signature().is_none() {
            return Ok(Validation::Invalid(Invalidity::SignatureMissing { depth }));
        }

        if !ucan.check_signature(did_codec)? {
            return Ok(Validation::Invalid(Invalidity::SignatureMismatch { depth }));
        }

        match ucan.proof() {
            None => {
                trace!(depth, "chain root reached");
                return Ok(Validation::Valid);
            }
            Some(proof_token) => {
                if !visited.insert(proof_token.to_owned()) {
                    return Ok(Validation::Invalid(Invalidity::CircularProof { depth }));
                }

                if depth == MAX_PROOF_DEPTH {
                    return Ok(Validation::Invalid(Invalidity::ChainTooDeep { depth }));
                }

                delegate_issuer = Some(ucan.issuer().to_owned());
                current = proof_token.to_owned();
                depth += 1;
            }
        }
    }
}

/// Resolve the issuer at the root of a token's delegation chain: the
/// issuer of the deepest proof, or of the token itself when it carries
/// none. Parse failures report the proof depth at which they occurred.
pub fn root_issuer(encoded_token: &str) -> Result<String, UcanError> {
    let mut current = encoded_token.to_owned();
    let mut depth = 0;

    loop {
        let ucan = Ucan::parse_at_depth(&current, depth)?;

        match ucan.proof() {
            None => return Ok(ucan.issuer().to_owned()),
            Some(proof_token) => {
                if depth == MAX_PROOF_DEPTH {
                    return Err(UcanError::MalformedToken {
                        depth,
                        reason: "proof chain extends beyond the maximum delegation depth".into(),
                    });
                }

                current = proof_token.to_owned();
                depth += 1;
            }
        }
    }
}

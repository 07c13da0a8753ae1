//! Capability-based authorization for Tidewater, expressed as chained
//! bearer tokens ("UCANs") bound to self-certifying `did:key` identifiers.
//!
//! A token grants its audience a potency over a resource for a bounded
//! window of time, and may reference an earlier token as proof that the
//! issuer was itself granted that authority. Delegation can only narrow
//! what a proof grants, never extend it.
//!
//! # Examples
//!
//! Issuing a token requires a [`crypto::KeyMaterial`] implementation — a
//! signing capability that owns the issuer's private key. See the
//! `tidewater-ucan-key-support` crate for ready-to-use implementations.
//!
//! ```rust
//! use tidewater_ucan::{builder::UcanBuilder, crypto::KeyMaterial};
//!
//! async fn issue_token<K: KeyMaterial>(
//!     issuer_key: &K,
//!     audience_did: &str,
//! ) -> Result<String, anyhow::Error> {
//!     Ok(UcanBuilder::default()
//!         .issued_by(issuer_key)
//!         .for_audience(audience_did)
//!         .with_lifetime(60)
//!         .build()?
//!         .sign()
//!         .await?
//!         .encode()?)
//! }
//! ```
//!
//! Received tokens are walked and verified with [`chain::validate`]. Note
//! that expiry is a separate check from chain validity: a chain whose
//! every link verifies can still be past its window, and callers are
//! expected to consult [`Ucan::is_expired`] as well.
//!
//! ```rust
//! use tidewater_ucan::{
//!     chain::{self, Validation},
//!     crypto::did::DidCodec,
//! };
//!
//! fn chain_is_trustworthy(encoded_token: &str) -> bool {
//!     matches!(
//!         chain::validate(encoded_token, &DidCodec::default()),
//!         Ok(Validation::Valid)
//!     )
//! }
//! ```

pub mod builder;
pub mod chain;
pub mod crypto;
pub mod error;
pub mod serde;
pub mod time;
pub mod ucan;

pub use self::ucan::Ucan;

#[cfg(test)]
mod tests;

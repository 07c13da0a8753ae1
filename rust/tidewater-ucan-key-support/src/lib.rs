//! Ready to use signing capabilities for the `tidewater-ucan` crate,
//! covering the key algorithms Tidewater verifies on the wire: Ed25519
//! for device and session keys, RSA for keys held by platform secure
//! enclaves that cannot produce Edwards-curve signatures.

pub mod ed25519;
pub mod rsa;

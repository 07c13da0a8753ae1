mod crypto;
mod identities;

pub use crypto::*;
pub use identities::*;

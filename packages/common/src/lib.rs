//! Shared plumbing for the sheetedit packages: the error type, content
//! fingerprints and document persistence.

pub mod error;
pub mod fingerprint;
pub mod store;

pub use error::*;
pub use fingerprint::*;
pub use store::*;

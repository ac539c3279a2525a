//! Player identity and skin records
//!
//! Value types shared by the storage layer, the resolver and provider implementations.

pub mod types;

pub use types::*;

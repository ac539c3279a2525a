//! Skin resolution pipeline
//!
//! Produces an authoritative skin record for a player from a `SkinProvider`,
//! reporting failures through a closed set of reasons.

pub mod errors;
pub mod resolver;

pub use errors::{Reason, SkinFetchError};
pub use resolver::ProfileResolver;

//! skincache - skin profile cache and resolver for game server plugins
//!
//! `SkinStorage` keeps one record per lowercase player name and persists the
//! worthwhile ones to `cache.json`. `ProfileResolver` turns a name and an
//! optional known identifier into an authoritative record through a
//! `SkinProvider`.

pub mod config;
pub mod fetch;
pub mod locale;
pub mod mojang;
pub mod profile;
pub mod provider;
pub mod service;
pub mod storage;

pub use config::Config;
pub use fetch::{ProfileResolver, Reason, SkinFetchError};
pub use profile::{Profile, SkinProfile, SkinProperty};
pub use provider::{ProviderError, SkinProvider};
pub use service::SkinService;
pub use storage::SkinStorage;

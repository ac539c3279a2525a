//! Skin lookup service
//!
//! Combines the storage and the resolver the way a login handler or an admin
//! command does.

pub mod skin_service;

pub use skin_service::SkinService;

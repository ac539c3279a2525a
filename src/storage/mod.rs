//! Skin record storage
//!
//! Concurrent name-keyed cache of skin records, persisted to a JSON file.

pub mod skin_storage;

pub use skin_storage::SkinStorage;

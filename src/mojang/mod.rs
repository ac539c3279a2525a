//! Mojang profile API client

pub mod client;
pub mod types;

pub use client::MojangClient;

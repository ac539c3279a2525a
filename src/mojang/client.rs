//! Mojang API Client
//!
//! Implements `SkinProvider` against the public profile and session endpoints.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{ProfileResponse, SessionProfileResponse};
use crate::config::ProviderConfig;
use crate::profile::{now_millis, Profile, SkinProfile, SkinProperty};
use crate::provider::{ProviderError, SkinProvider};

/// Mojang API client
#[derive(Clone)]
pub struct MojangClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL of the name → profile endpoint
    profile_url: String,
    /// Base URL of the session server profile endpoint
    session_url: String,
}

impl MojangClient {
    /// Create a client with the configured endpoints and request timeout
    pub fn with_config(config: &ProviderConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            profile_url: config.profile_url.trim_end_matches('/').to_string(),
            session_url: config.session_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `url` and decode the body
    ///
    /// Returns `Ok(None)` for 204, which the provider uses for unknown players.
    /// Other failures, 404 included, go through `ProviderError::from_status`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ProviderError> {
        debug!(url = %url, "Requesting Mojang API");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(url = %url, "Mojang API rate limit hit");
            }
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl SkinProvider for MojangClient {
    async fn get_profile(&self, name: &str) -> Result<Profile, ProviderError> {
        let url = format!("{}/{}", self.profile_url, urlencoding::encode(name));

        let response: ProfileResponse = self
            .get_json(&url)
            .await
            .map_err(|e| match e {
                ProviderError::NotFound(_) => ProviderError::NoSuchAccount(name.to_string()),
                other => other,
            })?
            .ok_or_else(|| ProviderError::NoSuchAccount(name.to_string()))?;

        debug!(name = name, id = %response.id, "Resolved Mojang profile");
        Ok(Profile::new(response.name, Some(response.id)))
    }

    async fn get_skin_profile(&self, id: &str) -> Result<SkinProfile, ProviderError> {
        let url = format!(
            "{}/{}?unsigned=false",
            self.session_url,
            urlencoding::encode(id)
        );

        let response: SessionProfileResponse = self
            .get_json(&url)
            .await
            .map_err(|e| match e {
                ProviderError::NotFound(_) => ProviderError::NotFound(id.to_string()),
                other => other,
            })?
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))?;

        let profile = Profile::new(response.name.clone(), Some(response.id.clone()));
        let textures = response
            .into_textures()
            .ok_or_else(|| ProviderError::NoSkinData(id.to_string()))?;

        debug!(id = id, name = %profile.name, "Fetched Mojang skin profile");
        Ok(SkinProfile::new(
            profile,
            Some(SkinProperty {
                value: textures.value,
                signature: textures.signature,
            }),
            now_millis(),
            false,
        ))
    }
}

//! Mojang API response types

use serde::Deserialize;

/// Response from the name → profile endpoint
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
}

/// Response from the session server profile endpoint
#[derive(Debug, Deserialize)]
pub struct SessionProfileResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyResponse>,
}

/// A signed profile property (the skin lives under "textures")
#[derive(Debug, Deserialize)]
pub struct PropertyResponse {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub signature: Option<String>,
}

impl SessionProfileResponse {
    /// Take the textures property, if present
    pub fn into_textures(self) -> Option<PropertyResponse> {
        self.properties.into_iter().find(|p| p.name == "textures")
    }
}

//! Caller-facing messages for skin fetch failures
//!
//! Looked up by `Reason`; overridable through the `messages` config section.

use serde::{Deserialize, Serialize};

use crate::fetch::Reason;

/// One message per failure reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub no_premium_account: String,
    pub no_skin_data: String,
    pub recode_failed: String,
    pub rate_limited: String,
    pub generic_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_premium_account: "There is no premium account with that name.".to_string(),
            no_skin_data: "That account has no skin.".to_string(),
            recode_failed: "The skin data could not be read.".to_string(),
            rate_limited: "Too many skin requests, try again later.".to_string(),
            generic_error: "Something went wrong while fetching the skin.".to_string(),
        }
    }
}

impl Messages {
    pub fn for_reason(&self, reason: Reason) -> &str {
        match reason {
            Reason::NoPremiumAccount => &self.no_premium_account,
            Reason::NoSkinData => &self.no_skin_data,
            Reason::RecodeFailed => &self.recode_failed,
            Reason::RateLimited => &self.rate_limited,
            Reason::GenericError => &self.generic_error,
        }
    }
}

//! Group membership check against the provider's profile API.

use fbrp_access::{Member, MembershipError, Profile};
use oauth2::AccessToken;
use rootcause::prelude::Report;
use tracing::instrument;

use crate::config::GateConfig;

/// Profile fields requested from the provider.
const PROFILE_FIELDS: &str = "id,name,groups{id}";

/// Checks whether a token's owner belongs to the secret group.
pub struct GroupChecker {
    http_client: reqwest::Client,
    profile_url: String,
    group_id: String,
}

impl GroupChecker {
    /// Creates a checker for the configured profile endpoint and group.
    pub fn new(config: &GateConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            profile_url: config.provider.profile_url.clone(),
            group_id: config.secret_group_id.clone(),
        }
    }

    /// Fetches the token owner's profile and looks for the secret group.
    ///
    /// # Errors
    ///
    /// Returns `NotAMember` when the group list lacks the secret group, and a
    /// distinct variant for transport, status, or decode failures.
    #[instrument(skip_all, fields(group_id = %self.group_id))]
    pub async fn verify_member(
        &self,
        token: &AccessToken,
    ) -> Result<Member, Report<MembershipError>> {
        let response = self
            .http_client
            .get(&self.profile_url)
            .query(&[("fields", PROFILE_FIELDS)])
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| MembershipError::Request {
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MembershipError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.bytes().await.map_err(|e| MembershipError::Request {
            details: e.to_string(),
        })?;

        let profile = Profile::from_slice(&body)?;
        Ok(profile.verify_member(&self.group_id)?)
    }
}

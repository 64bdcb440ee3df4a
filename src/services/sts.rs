//! AWS STS snippets

use aws_sdk_sts::Client as StsClient;
use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::utils::{format_date_time, mask};

/// Wrapper around the STS SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct StsService {
    client: StsClient,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account: {}\nARN: {}\nUserId: {}",
            self.account.as_deref().unwrap_or("-"),
            self.arn.as_deref().unwrap_or("-"),
            self.user_id.as_deref().unwrap_or("-")
        )
    }
}

/// Temporary credentials summary. The secret key and session token are
/// never copied out of the SDK response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssumedRole {
    pub assumed_role_arn: Option<String>,
    pub access_key_id: String,
    pub expiration: String,
}

impl fmt::Display for AssumedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Assumed {} (access key {}, expires {})",
            self.assumed_role_arn.as_deref().unwrap_or("role"),
            mask(&self.access_key_id, 4),
            self.expiration
        )
    }
}

impl StsService {
    pub fn new(client: StsClient) -> Self {
        Self { client }
    }

    /// "Who am I?" for the resolved credentials
    pub async fn get_caller_identity(&self) -> Result<CallerIdentity> {
        tracing::debug!("Calling STS GetCallerIdentity");

        let output = self.client.get_caller_identity().send().await?;

        Ok(CallerIdentity {
            account: output.account().map(str::to_string),
            arn: output.arn().map(str::to_string),
            user_id: output.user_id().map(str::to_string),
        })
    }

    pub async fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        duration_seconds: Option<i32>,
    ) -> Result<AssumedRole> {
        tracing::debug!(
            role_arn = %role_arn,
            session_name = %session_name,
            "Calling STS AssumeRole"
        );

        let output = self
            .client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .set_duration_seconds(duration_seconds)
            .send()
            .await?;

        let (access_key_id, expiration) = match output.credentials() {
            Some(credentials) => (
                credentials.access_key_id().to_string(),
                format_date_time(credentials.expiration()),
            ),
            None => (String::new(), String::new()),
        };

        Ok(AssumedRole {
            assumed_role_arn: output.assumed_role_user().map(|u| u.arn().to_string()),
            access_key_id,
            expiration,
        })
    }
}

//! AWS IAM snippets

use aws_sdk_iam::types::{Role, User};
use aws_sdk_iam::Client as IamClient;
use serde::Serialize;
use std::fmt;

use crate::error::{Result, SnippetError};
use crate::utils::format_date_time;

/// Wrapper around the IAM SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct IamService {
    client: IamClient,
}

/// Name, ARN and creation date shared by users and roles
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrincipalSummary {
    pub name: String,
    pub arn: String,
    pub path: String,
    pub created: String,
}

impl fmt::Display for PrincipalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.created, self.arn)
    }
}

impl From<&User> for PrincipalSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.user_name().to_string(),
            arn: user.arn().to_string(),
            path: user.path().to_string(),
            created: format_date_time(user.create_date()),
        }
    }
}

impl From<&Role> for PrincipalSummary {
    fn from(role: &Role) -> Self {
        Self {
            name: role.role_name().to_string(),
            arn: role.arn().to_string(),
            path: role.path().to_string(),
            created: format_date_time(role.create_date()),
        }
    }
}

impl IamService {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }

    pub async fn list_users(&self) -> Result<Vec<PrincipalSummary>> {
        tracing::debug!("Calling IAM ListUsers");

        let mut users = self.client.list_users().into_paginator().items().send();

        let mut summaries = Vec::new();
        while let Some(user) = users.next().await {
            summaries.push(PrincipalSummary::from(&user?));
        }
        Ok(summaries)
    }

    pub async fn create_user(&self, name: &str) -> Result<PrincipalSummary> {
        tracing::debug!(name = %name, "Calling IAM CreateUser");

        let output = self.client.create_user().user_name(name).send().await?;

        output
            .user()
            .map(PrincipalSummary::from)
            .ok_or_else(|| SnippetError::Response(format!("no user returned for {name}")))
    }

    /// Delete a user. Fails with `DeleteConflict` while the user still has
    /// keys, policies or group memberships.
    pub async fn delete_user(&self, name: &str) -> Result<()> {
        tracing::debug!(name = %name, "Calling IAM DeleteUser");
        self.client.delete_user().user_name(name).send().await?;
        Ok(())
    }

    pub async fn list_roles(&self, path_prefix: Option<&str>) -> Result<Vec<PrincipalSummary>> {
        tracing::debug!(path_prefix = ?path_prefix, "Calling IAM ListRoles");

        let mut roles = self
            .client
            .list_roles()
            .set_path_prefix(path_prefix.map(str::to_string))
            .into_paginator()
            .items()
            .send();

        let mut summaries = Vec::new();
        while let Some(role) = roles.next().await {
            summaries.push(PrincipalSummary::from(&role?));
        }
        Ok(summaries)
    }
}

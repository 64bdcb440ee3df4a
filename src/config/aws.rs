//! AWS SDK configuration
//!
//! This module builds the shared AWS SDK configuration and the per-service
//! clients used by the snippets, supporting custom endpoints for local
//! development and testing.

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region, SdkConfig};

use crate::config::{Settings, DEFAULT_REGION};

/// AWS configuration builder
///
/// Creates AWS SDK configuration with support for:
/// - Custom regions (falling back to the default region chain, then
///   `us-east-1`)
/// - Named profiles from `~/.aws/config`
/// - Custom endpoint URLs for local testing
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
}

/// Applies the custom endpoint (if any) to a service-specific config builder.
macro_rules! service_client {
    ($settings:expr, $sdk_config:expr, $sdk:ident) => {{
        match &$settings.endpoint_url {
            Some(endpoint_url) => {
                tracing::debug!(
                    endpoint = %endpoint_url,
                    service = stringify!($sdk),
                    "Using custom endpoint"
                );
                let conf = $sdk::config::Builder::from($sdk_config)
                    .endpoint_url(endpoint_url)
                    .build();
                $sdk::Client::from_conf(conf)
            }
            None => $sdk::Client::new($sdk_config),
        }
    }};
}

impl<'a> AwsConfigBuilder<'a> {
    /// Create a new AWS configuration builder
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the base AWS SDK configuration
    ///
    /// Credentials come from the SDK's default provider chain (environment,
    /// profile, SSO, IMDS); nothing here resolves them by hand.
    pub async fn build_sdk_config(&self) -> SdkConfig {
        let region_provider =
            RegionProviderChain::first_try(self.settings.aws_region.clone().map(Region::new))
                .or_default_provider()
                .or_else(Region::from_static(DEFAULT_REGION));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

        if let Some(profile) = &self.settings.aws_profile {
            loader = loader.profile_name(profile);
        }

        loader.load().await
    }

    /// Create an S3 client
    ///
    /// With a custom endpoint, path-style addressing is forced since
    /// LocalStack and MinIO don't serve virtual-hosted buckets.
    pub fn s3_client(&self, sdk_config: &SdkConfig) -> aws_sdk_s3::Client {
        match &self.settings.endpoint_url {
            Some(endpoint_url) => {
                tracing::debug!(endpoint = %endpoint_url, "Using custom S3 endpoint");
                let conf = aws_sdk_s3::config::Builder::from(sdk_config)
                    .endpoint_url(endpoint_url)
                    .force_path_style(true)
                    .build();
                aws_sdk_s3::Client::from_conf(conf)
            }
            None => aws_sdk_s3::Client::new(sdk_config),
        }
    }

    pub fn dynamodb_client(&self, sdk_config: &SdkConfig) -> aws_sdk_dynamodb::Client {
        service_client!(self.settings, sdk_config, aws_sdk_dynamodb)
    }

    pub fn sns_client(&self, sdk_config: &SdkConfig) -> aws_sdk_sns::Client {
        service_client!(self.settings, sdk_config, aws_sdk_sns)
    }

    pub fn sts_client(&self, sdk_config: &SdkConfig) -> aws_sdk_sts::Client {
        service_client!(self.settings, sdk_config, aws_sdk_sts)
    }

    pub fn acm_client(&self, sdk_config: &SdkConfig) -> aws_sdk_acm::Client {
        service_client!(self.settings, sdk_config, aws_sdk_acm)
    }

    pub fn bedrock_client(&self, sdk_config: &SdkConfig) -> aws_sdk_bedrock::Client {
        service_client!(self.settings, sdk_config, aws_sdk_bedrock)
    }

    pub fn bedrock_runtime_client(&self, sdk_config: &SdkConfig) -> aws_sdk_bedrockruntime::Client {
        service_client!(self.settings, sdk_config, aws_sdk_bedrockruntime)
    }

    pub fn kinesis_client(&self, sdk_config: &SdkConfig) -> aws_sdk_kinesis::Client {
        service_client!(self.settings, sdk_config, aws_sdk_kinesis)
    }

    pub fn iam_client(&self, sdk_config: &SdkConfig) -> aws_sdk_iam::Client {
        service_client!(self.settings, sdk_config, aws_sdk_iam)
    }

    pub fn lambda_client(&self, sdk_config: &SdkConfig) -> aws_sdk_lambda::Client {
        service_client!(self.settings, sdk_config, aws_sdk_lambda)
    }
}

/// Build AWS SDK config from settings (convenience function)
pub async fn build_aws_config(settings: &Settings) -> SdkConfig {
    AwsConfigBuilder::new(settings).build_sdk_config().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_sdk_config_always_has_region() {
        let settings = Settings::default();
        let config = build_aws_config(&settings).await;

        assert!(config.region().is_some());
    }

    #[tokio::test]
    async fn test_region_override() {
        let settings = Settings {
            aws_region: Some("eu-west-1".to_string()),
            ..Settings::default()
        };
        let config = build_aws_config(&settings).await;

        assert_eq!(config.region().map(|r| r.as_ref()), Some("eu-west-1"));
    }

    #[tokio::test]
    async fn test_custom_endpoint_clients() {
        let settings = Settings {
            aws_region: Some("us-east-1".to_string()),
            endpoint_url: Some("http://localhost:4566".to_string()),
            ..Settings::default()
        };
        let builder = AwsConfigBuilder::new(&settings);
        let sdk_config = builder.build_sdk_config().await;

        let s3 = builder.s3_client(&sdk_config);
        assert_eq!(s3.config().region().map(|r| r.as_ref()), Some("us-east-1"));

        let _dynamodb = builder.dynamodb_client(&sdk_config);
        let _lambda = builder.lambda_client(&sdk_config);
    }
}

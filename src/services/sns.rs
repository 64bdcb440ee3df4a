//! Amazon SNS snippets

use aws_sdk_sns::Client as SnsClient;
use serde::Serialize;
use std::fmt;

use crate::error::Result;

/// Wrapper around the SNS SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct SnsService {
    client: SnsClient,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublishReceipt {
    pub topic_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl fmt::Display for PublishReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Published message {} to {}",
            self.message_id.as_deref().unwrap_or("(no id)"),
            self.topic_arn
        )
    }
}

impl SnsService {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }

    /// List the ARNs of all topics in the region
    pub async fn list_topics(&self) -> Result<Vec<String>> {
        tracing::debug!("Calling SNS ListTopics");

        let mut topics = self.client.list_topics().into_paginator().items().send();

        let mut arns = Vec::new();
        while let Some(topic) = topics.next().await {
            if let Some(arn) = topic?.topic_arn() {
                arns.push(arn.to_string());
            }
        }
        Ok(arns)
    }

    /// Create a topic (idempotent for an existing name) and return its ARN
    pub async fn create_topic(&self, name: &str) -> Result<String> {
        tracing::debug!(name = %name, "Calling SNS CreateTopic");

        let output = self.client.create_topic().name(name).send().await?;

        Ok(output.topic_arn().unwrap_or_default().to_string())
    }

    pub async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt> {
        tracing::debug!(topic_arn = %topic_arn, "Calling SNS Publish");

        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .set_subject(subject.map(str::to_string))
            .send()
            .await?;

        Ok(PublishReceipt {
            topic_arn: topic_arn.to_string(),
            message_id: output.message_id().map(str::to_string),
        })
    }

    /// Subscribe an endpoint (email address, SQS ARN, URL, ...) to a topic
    ///
    /// Returns the subscription ARN, or `pending confirmation` for protocols
    /// that need the endpoint owner to confirm first.
    pub async fn subscribe(&self, topic_arn: &str, protocol: &str, endpoint: &str) -> Result<String> {
        tracing::debug!(
            topic_arn = %topic_arn,
            protocol = %protocol,
            "Calling SNS Subscribe"
        );

        let output = self
            .client
            .subscribe()
            .topic_arn(topic_arn)
            .protocol(protocol)
            .endpoint(endpoint)
            .return_subscription_arn(true)
            .send()
            .await?;

        Ok(output
            .subscription_arn()
            .unwrap_or("pending confirmation")
            .to_string())
    }

    pub async fn delete_topic(&self, topic_arn: &str) -> Result<()> {
        tracing::debug!(topic_arn = %topic_arn, "Calling SNS DeleteTopic");
        self.client.delete_topic().topic_arn(topic_arn).send().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sns::operation::create_topic::CreateTopicOutput;
    use aws_sdk_sns::operation::delete_topic::DeleteTopicOutput;
    use aws_sdk_sns::operation::list_topics::ListTopicsOutput;
    use aws_sdk_sns::operation::publish::PublishOutput;
    use aws_sdk_sns::operation::subscribe::SubscribeOutput;
    use aws_sdk_sns::types::Topic;
    use aws_sdk_sns::Client;
    use aws_smithy_mocks::{mock, mock_client};

    const TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:alerts";

    #[tokio::test]
    async fn test_list_topics() {
        let rule = mock!(Client::list_topics).then_output(|| {
            ListTopicsOutput::builder()
                .topics(Topic::builder().topic_arn(TOPIC_ARN).build())
                .build()
        });
        let service = SnsService::new(mock_client!(aws_sdk_sns, &[&rule]));

        assert_eq!(service.list_topics().await.unwrap(), [TOPIC_ARN]);
    }

    #[tokio::test]
    async fn test_create_topic() {
        let rule = mock!(Client::create_topic)
            .match_requests(|req| req.name() == Some("alerts"))
            .then_output(|| CreateTopicOutput::builder().topic_arn(TOPIC_ARN).build());
        let service = SnsService::new(mock_client!(aws_sdk_sns, &[&rule]));

        assert_eq!(service.create_topic("alerts").await.unwrap(), TOPIC_ARN);
    }

    #[tokio::test]
    async fn test_publish_with_subject() {
        let rule = mock!(Client::publish)
            .match_requests(|req| {
                req.topic_arn() == Some(TOPIC_ARN)
                    && req.message() == Some("disk almost full")
                    && req.subject() == Some("Alert")
            })
            .then_output(|| PublishOutput::builder().message_id("msg-1").build());
        let service = SnsService::new(mock_client!(aws_sdk_sns, &[&rule]));

        let receipt = service
            .publish(TOPIC_ARN, "disk almost full", Some("Alert"))
            .await
            .unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("msg-1"));
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_email() {
        let rule = mock!(Client::subscribe)
            .match_requests(|req| {
                req.protocol() == Some("email")
                    && req.endpoint() == Some("ops@example.com")
                    && req.return_subscription_arn() == Some(true)
            })
            .then_output(|| SubscribeOutput::builder().build());
        let service = SnsService::new(mock_client!(aws_sdk_sns, &[&rule]));

        let arn = service
            .subscribe(TOPIC_ARN, "email", "ops@example.com")
            .await
            .unwrap();

        assert_eq!(arn, "pending confirmation");
    }

    #[tokio::test]
    async fn test_delete_topic() {
        let rule = mock!(Client::delete_topic)
            .match_requests(|req| req.topic_arn() == Some(TOPIC_ARN))
            .then_output(|| DeleteTopicOutput::builder().build());
        let service = SnsService::new(mock_client!(aws_sdk_sns, &[&rule]));

        service.delete_topic(TOPIC_ARN).await.unwrap();

        assert_eq!(rule.num_calls(), 1);
    }
}

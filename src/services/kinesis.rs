//! Amazon Kinesis Data Streams snippets

use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::Client as KinesisClient;
use serde::Serialize;
use std::fmt;

use crate::error::{Result, SnippetError};

/// Wrapper around the Kinesis SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct KinesisService {
    client: KinesisClient,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StreamSummary {
    pub name: String,
    pub arn: String,
    pub status: String,
    pub open_shard_count: i32,
    pub retention_period_hours: i32,
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{} open shards\t{}h retention",
            self.name, self.status, self.open_shard_count, self.retention_period_hours
        )
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordReceipt {
    pub shard_id: String,
    pub sequence_number: String,
}

impl fmt::Display for RecordReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record stored in {} at {}", self.shard_id, self.sequence_number)
    }
}

impl KinesisService {
    pub fn new(client: KinesisClient) -> Self {
        Self { client }
    }

    /// Create a provisioned stream. Creation is asynchronous, the stream
    /// starts out `CREATING`.
    pub async fn create_stream(&self, name: &str, shard_count: i32) -> Result<()> {
        tracing::debug!(name = %name, shard_count, "Calling Kinesis CreateStream");
        self.client
            .create_stream()
            .stream_name(name)
            .shard_count(shard_count)
            .send()
            .await?;
        Ok(())
    }

    /// List stream names, following `has_more_streams` until exhausted
    pub async fn list_streams(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        loop {
            tracing::debug!(after = ?names.last(), "Calling Kinesis ListStreams");

            let output = self
                .client
                .list_streams()
                .set_exclusive_start_stream_name(names.last().cloned())
                .send()
                .await?;

            names.extend(output.stream_names().iter().cloned());

            if !output.has_more_streams() || output.stream_names().is_empty() {
                break;
            }
        }

        Ok(names)
    }

    pub async fn describe_stream(&self, name: &str) -> Result<StreamSummary> {
        tracing::debug!(name = %name, "Calling Kinesis DescribeStreamSummary");

        let output = self
            .client
            .describe_stream_summary()
            .stream_name(name)
            .send()
            .await?;

        let summary = output.stream_description_summary().ok_or_else(|| {
            SnippetError::Response(format!("no summary returned for stream {name}"))
        })?;

        Ok(StreamSummary {
            name: summary.stream_name().to_string(),
            arn: summary.stream_arn().to_string(),
            status: summary.stream_status().as_str().to_string(),
            open_shard_count: summary.open_shard_count(),
            retention_period_hours: summary.retention_period_hours(),
        })
    }

    /// Write one record; the partition key decides the shard
    pub async fn put_record(
        &self,
        name: &str,
        partition_key: &str,
        data: impl Into<Vec<u8>>,
    ) -> Result<RecordReceipt> {
        let data = data.into();
        tracing::debug!(
            name = %name,
            partition_key = %partition_key,
            bytes = data.len(),
            "Calling Kinesis PutRecord"
        );

        let output = self
            .client
            .put_record()
            .stream_name(name)
            .partition_key(partition_key)
            .data(Blob::new(data))
            .send()
            .await?;

        Ok(RecordReceipt {
            shard_id: output.shard_id().to_string(),
            sequence_number: output.sequence_number().to_string(),
        })
    }

    pub async fn delete_stream(&self, name: &str) -> Result<()> {
        tracing::debug!(name = %name, "Calling Kinesis DeleteStream");
        self.client.delete_stream().stream_name(name).send().await?;
        Ok(())
    }
}

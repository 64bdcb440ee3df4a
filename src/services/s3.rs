//! Amazon S3 snippets
//!
//! Bucket and object basics: list, create, upload, download, copy, delete.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client as S3Client;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::utils::{format_opt, preview_bytes};

/// Characters left as-is in a `CopySource` value: RFC 3986 unreserved plus `/`
const COPY_SOURCE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// `bucket/key` with the key URL-encoded, as CopyObject expects
fn copy_source(bucket: &str, key: &str) -> String {
    format!("{}/{}", bucket, utf8_percent_encode(key, COPY_SOURCE))
}

/// Wrapper around the S3 SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct S3Service {
    client: S3Client,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BucketSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

impl fmt::Display for BucketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.creation_date {
            Some(created) => write!(f, "{}\t{}", self.name, created),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl fmt::Display for ObjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{} bytes", self.key, self.size)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PutObjectSummary {
    pub bucket: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

impl fmt::Display for PutObjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uploaded s3://{}/{}", self.bucket, self.key)?;
        if let Some(e_tag) = &self.e_tag {
            write!(f, " (ETag {})", e_tag)?;
        }
        Ok(())
    }
}

/// An object read fully into memory
#[derive(Debug, Clone, Serialize)]
pub struct DownloadedObject {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_length: i64,
    #[serde(skip)]
    pub body: Vec<u8>,
}

impl fmt::Display for DownloadedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes, {})\n{}",
            self.key,
            self.content_length,
            self.content_type.as_deref().unwrap_or("unknown type"),
            preview_bytes(&self.body, 512)
        )
    }
}

impl S3Service {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying AWS SDK client
    pub fn client(&self) -> &S3Client {
        &self.client
    }

    /// List the buckets owned by the caller
    pub async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        tracing::debug!("Calling S3 ListBuckets");

        let output = self.client.list_buckets().send().await?;

        Ok(output
            .buckets()
            .iter()
            .map(|bucket| BucketSummary {
                name: bucket.name().unwrap_or_default().to_string(),
                creation_date: format_opt(bucket.creation_date()),
            })
            .collect())
    }

    /// Create a bucket in `region`
    ///
    /// `us-east-1` is the one region that rejects an explicit location constraint.
    pub async fn create_bucket(&self, bucket: &str, region: &str) -> Result<Option<String>> {
        tracing::debug!(bucket = %bucket, region = %region, "Calling S3 CreateBucket");

        let mut request = self.client.create_bucket().bucket(bucket);
        if region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        let output = request.send().await?;
        Ok(output.location().map(str::to_string))
    }

    /// Delete an (empty) bucket
    pub async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        tracing::debug!(bucket = %bucket, "Calling S3 DeleteBucket");
        self.client.delete_bucket().bucket(bucket).send().await?;
        Ok(())
    }

    /// Upload an in-memory body
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<PutObjectSummary> {
        self.put(bucket, key, ByteStream::from(body.into()), content_type)
            .await
    }

    /// Upload a local file, streaming it from disk
    pub async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
    ) -> Result<PutObjectSummary> {
        let body = ByteStream::from_path(path.as_ref()).await?;
        self.put(bucket, key, body, None).await
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: Option<&str>,
    ) -> Result<PutObjectSummary> {
        tracing::debug!(bucket = %bucket, key = %key, "Calling S3 PutObject");

        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await?;

        Ok(PutObjectSummary {
            bucket: bucket.to_string(),
            key: key.to_string(),
            e_tag: output.e_tag().map(str::to_string),
            version_id: output.version_id().map(str::to_string),
        })
    }

    /// Download an object into memory
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<DownloadedObject> {
        tracing::debug!(bucket = %bucket, key = %key, "Calling S3 GetObject");

        let output = self.client.get_object().bucket(bucket).key(key).send().await?;

        let content_type = output.content_type().map(str::to_string);
        let body = output.body.collect().await?.into_bytes().to_vec();
        let content_length = output.content_length.unwrap_or(body.len() as i64);

        Ok(DownloadedObject {
            key: key.to_string(),
            content_type,
            content_length,
            body,
        })
    }

    /// List every object under `prefix`, following continuation tokens
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectSummary>> {
        tracing::debug!(bucket = %bucket, prefix = ?prefix, "Calling S3 ListObjectsV2");

        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_string))
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            for object in page?.contents() {
                objects.push(ObjectSummary {
                    key: object.key().unwrap_or_default().to_string(),
                    size: object.size().unwrap_or_default(),
                    last_modified: format_opt(object.last_modified()),
                });
            }
        }

        Ok(objects)
    }

    /// Server-side copy of an object
    pub async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<()> {
        tracing::debug!(
            source = %format!("{}/{}", source_bucket, source_key),
            dest = %format!("{}/{}", dest_bucket, dest_key),
            "Calling S3 CopyObject"
        );

        self.client
            .copy_object()
            .copy_source(copy_source(source_bucket, source_key))
            .bucket(dest_bucket)
            .key(dest_key)
            .send()
            .await?;

        Ok(())
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        tracing::debug!(bucket = %bucket, key = %key, "Calling S3 DeleteObject");
        self.client.delete_object().bucket(bucket).key(key).send().await?;
        Ok(())
    }
}

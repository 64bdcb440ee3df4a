//! S3 getting-started walkthrough
//!
//! Creates a bucket, uploads, lists, downloads and copies an object, then
//! cleans up.
//!
//! Usage:
//!   cargo run --bin s3_tutorial
//!
//! Against LocalStack:
//!   AWS_ENDPOINT_URL=http://localhost:4566 cargo run --bin s3_tutorial -- --bucket demo

use anyhow::{Context as _, Result};
use aws_sdk_snippets::{
    config::{AwsConfigBuilder, Settings, DEFAULT_REGION},
    error::ServiceErrorKind,
    logging::init_tracing,
    services::S3Service,
    utils::preview_bytes,
};
use clap::Parser;

/// Walk through the basic S3 object operations
#[derive(Parser, Debug)]
#[command(name = "s3_tutorial")]
struct Args {
    /// Bucket to create and use (a random name by default)
    #[arg(long)]
    bucket: Option<String>,

    /// Endpoint URL (for LocalStack or MinIO)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Leave the bucket and objects in place afterwards
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load()?;
    if let Some(url) = args.endpoint_url {
        settings.endpoint_url = Some(url);
    }
    settings.validate()?;
    init_tracing(&settings.log_level, settings.log_format);

    let builder = AwsConfigBuilder::new(&settings);
    let sdk_config = builder.build_sdk_config().await;
    let region = sdk_config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let s3 = S3Service::new(builder.s3_client(&sdk_config));

    let bucket = args
        .bucket
        .unwrap_or_else(|| format!("aws-snippets-{}", uuid::Uuid::new_v4().simple()));
    let key = "tutorial/hello.txt";
    let copy_key = "tutorial/hello-copy.txt";

    println!("\n🚀 S3 tutorial using bucket {bucket} in {region}\n");

    match s3.create_bucket(&bucket, &region).await {
        Ok(_) => println!("✅ Created bucket: {bucket}"),
        Err(e) if e.kind() == Some(ServiceErrorKind::AlreadyExists) => {
            println!("⏭️  Bucket already exists: {bucket}")
        }
        Err(e) => return Err(e).context("create bucket"),
    }

    let body = format!("Hello from aws-snippets at {}\n", chrono::Utc::now().to_rfc3339());
    let uploaded = s3
        .put_object(&bucket, key, body, Some("text/plain"))
        .await
        .context("put object")?;
    println!("✅ {uploaded}");

    println!("📂 Objects in {bucket}:");
    for object in s3.list_objects(&bucket, Some("tutorial/")).await? {
        println!("   {object}");
    }

    let downloaded = s3.get_object(&bucket, key).await.context("get object")?;
    println!("📄 Downloaded {key}: {}", preview_bytes(&downloaded.body, 80));

    s3.copy_object(&bucket, key, &bucket, copy_key).await?;
    println!("✅ Copied {key} to {copy_key}");

    if args.keep {
        println!("\n✅ Done, bucket {bucket} kept\n");
    } else {
        for object_key in [key, copy_key] {
            s3.delete_object(&bucket, object_key).await?;
            println!("🗑️  Deleted {object_key}");
        }
        s3.delete_bucket(&bucket).await.context("delete bucket")?;
        println!("\n✅ Done, bucket {bucket} deleted\n");
    }

    tracing::info!(bucket = %bucket, kept = args.keep, "S3 tutorial complete");

    Ok(())
}

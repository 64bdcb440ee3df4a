//! `aws-snippets s3 ...`

use clap::Subcommand;
use std::path::PathBuf;

use super::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum S3Command {
    /// List buckets owned by the caller
    ListBuckets,

    /// Create a bucket in the current region
    CreateBucket { bucket: String },

    /// Delete an empty bucket
    DeleteBucket { bucket: String },

    /// Upload a local file
    Upload {
        bucket: String,
        key: String,
        file: PathBuf,
    },

    /// Upload a string body
    PutObject {
        bucket: String,
        key: String,
        body: String,
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Download an object, to a file or as a preview on stdout
    GetObject {
        bucket: String,
        key: String,
        /// Write the body here instead of printing a preview
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List objects, optionally under a prefix
    ListObjects {
        bucket: String,
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Server-side copy of an object
    CopyObject {
        source_bucket: String,
        source_key: String,
        dest_bucket: String,
        dest_key: String,
    },

    DeleteObject { bucket: String, key: String },
}

pub async fn run(command: S3Command, ctx: &Context) -> Result<()> {
    let s3 = ctx.s3();
    let out = &ctx.output;

    match command {
        S3Command::ListBuckets => out.emit_list(&s3.list_buckets().await?),
        S3Command::CreateBucket { bucket } => {
            let location = s3.create_bucket(&bucket, ctx.region()).await?;
            out.done(&format!(
                "Created bucket {} at {}",
                bucket,
                location.as_deref().unwrap_or(ctx.region())
            ))
        }
        S3Command::DeleteBucket { bucket } => {
            s3.delete_bucket(&bucket).await?;
            out.done(&format!("Deleted bucket {bucket}"))
        }
        S3Command::Upload { bucket, key, file } => {
            out.emit(&s3.upload_file(&bucket, &key, &file).await?)
        }
        S3Command::PutObject {
            bucket,
            key,
            body,
            content_type,
        } => out.emit(
            &s3.put_object(&bucket, &key, body, content_type.as_deref())
                .await?,
        ),
        S3Command::GetObject { bucket, key, out: path } => {
            let object = s3.get_object(&bucket, &key).await?;
            match path {
                Some(path) => {
                    tokio::fs::write(&path, &object.body).await?;
                    out.done(&format!(
                        "Wrote {} bytes to {}",
                        object.body.len(),
                        path.display()
                    ))
                }
                None => out.emit(&object),
            }
        }
        S3Command::ListObjects { bucket, prefix } => {
            out.emit_list(&s3.list_objects(&bucket, prefix.as_deref()).await?)
        }
        S3Command::CopyObject {
            source_bucket,
            source_key,
            dest_bucket,
            dest_key,
        } => {
            s3.copy_object(&source_bucket, &source_key, &dest_bucket, &dest_key)
                .await?;
            out.done(&format!(
                "Copied s3://{source_bucket}/{source_key} to s3://{dest_bucket}/{dest_key}"
            ))
        }
        S3Command::DeleteObject { bucket, key } => {
            s3.delete_object(&bucket, &key).await?;
            out.done(&format!("Deleted s3://{bucket}/{key}"))
        }
    }
}

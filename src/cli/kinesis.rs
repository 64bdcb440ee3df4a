//! `aws-snippets kinesis ...`

use clap::Subcommand;

use super::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum KinesisCommand {
    CreateStream {
        name: String,
        #[arg(long, default_value_t = 1)]
        shard_count: i32,
    },

    ListStreams,

    DescribeStream { name: String },

    /// Put one record; DATA is sent as UTF-8 bytes
    PutRecord {
        name: String,
        partition_key: String,
        data: String,
    },

    DeleteStream { name: String },
}

pub async fn run(command: KinesisCommand, ctx: &Context) -> Result<()> {
    let kinesis = ctx.kinesis();
    let out = &ctx.output;

    match command {
        KinesisCommand::CreateStream { name, shard_count } => {
            kinesis.create_stream(&name, shard_count).await?;
            out.done(&format!("Creating stream {name} with {shard_count} shard(s)"))
        }
        KinesisCommand::ListStreams => out.emit_list(&kinesis.list_streams().await?),
        KinesisCommand::DescribeStream { name } => {
            out.emit(&kinesis.describe_stream(&name).await?)
        }
        KinesisCommand::PutRecord {
            name,
            partition_key,
            data,
        } => out.emit(&kinesis.put_record(&name, &partition_key, data).await?),
        KinesisCommand::DeleteStream { name } => {
            kinesis.delete_stream(&name).await?;
            out.done(&format!("Deleting stream {name}"))
        }
    }
}

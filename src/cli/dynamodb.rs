//! `aws-snippets dynamodb ...`
//!
//! Keys, items and values are given as JSON on the command line. A table
//! made with `create-table Movies --partition-key year:N --sort-key title`
//! takes keys like `'{"year": 2013, "title": "Rush"}'`.

use clap::Subcommand;
use serde_json::Value;
use std::time::Duration;

use super::Context;
use crate::error::{Result, SnippetError};
use crate::services::KeySpec;

#[derive(Subcommand, Debug)]
pub enum DynamoDbCommand {
    ListTables,

    /// Create an on-demand table
    CreateTable {
        table: String,
        /// Partition key as NAME or NAME:TYPE (TYPE is S, N or B; default S)
        #[arg(long)]
        partition_key: KeySpec,
        /// Optional sort key, same form as the partition key
        #[arg(long)]
        sort_key: Option<KeySpec>,
        /// Wait until the table is ACTIVE
        #[arg(long)]
        wait: bool,
        /// Maximum time to wait, in seconds
        #[arg(long, default_value_t = 120)]
        wait_secs: u64,
    },

    DescribeTable { table: String },

    /// Write an item (JSON object)
    PutItem { table: String, item: String },

    /// Read an item by key (JSON object)
    GetItem { table: String, key: String },

    /// All items with the given partition key value
    Query {
        table: String,
        partition_key: String,
        /// Partition key value as JSON, e.g. 2013 or '"Rush"'
        value: String,
    },

    Scan { table: String },

    /// Set one attribute on an item
    UpdateItem {
        table: String,
        key: String,
        attribute: String,
        /// New value as JSON
        value: String,
    },

    DeleteItem { table: String, key: String },

    DeleteTable { table: String },
}

fn parse_json(arg: &str, what: &str) -> Result<Value> {
    serde_json::from_str(arg)
        .map_err(|e| SnippetError::invalid_input(format!("{what} is not valid JSON: {e}")))
}

pub async fn run(command: DynamoDbCommand, ctx: &Context) -> Result<()> {
    let dynamodb = ctx.dynamodb();
    let out = &ctx.output;

    match command {
        DynamoDbCommand::ListTables => out.emit_list(&dynamodb.list_tables().await?),
        DynamoDbCommand::CreateTable {
            table,
            partition_key,
            sort_key,
            wait,
            wait_secs,
        } => {
            let summary = dynamodb
                .create_table(&table, &partition_key, sort_key.as_ref())
                .await?;
            if wait {
                dynamodb
                    .wait_for_table(&table, Duration::from_secs(wait_secs))
                    .await?;
                out.emit(&dynamodb.describe_table(&table).await?)
            } else {
                out.emit(&summary)
            }
        }
        DynamoDbCommand::DescribeTable { table } => {
            out.emit(&dynamodb.describe_table(&table).await?)
        }
        DynamoDbCommand::PutItem { table, item } => {
            dynamodb.put_item(&table, &parse_json(&item, "item")?).await?;
            out.done(&format!("Put item into {table}"))
        }
        DynamoDbCommand::GetItem { table, key } => {
            match dynamodb.get_item(&table, &parse_json(&key, "key")?).await? {
                Some(item) => out.emit_json(&item),
                None => out.done("Item not found"),
            }
        }
        DynamoDbCommand::Query {
            table,
            partition_key,
            value,
        } => {
            let items = dynamodb
                .query(&table, &partition_key, &parse_json(&value, "value")?)
                .await?;
            out.emit_json(&items)
        }
        DynamoDbCommand::Scan { table } => out.emit_json(&dynamodb.scan(&table).await?),
        DynamoDbCommand::UpdateItem {
            table,
            key,
            attribute,
            value,
        } => {
            let updated = dynamodb
                .update_item(
                    &table,
                    &parse_json(&key, "key")?,
                    &attribute,
                    &parse_json(&value, "value")?,
                )
                .await?;
            out.emit_json(&updated)
        }
        DynamoDbCommand::DeleteItem { table, key } => {
            dynamodb.delete_item(&table, &parse_json(&key, "key")?).await?;
            out.done(&format!("Deleted item from {table}"))
        }
        DynamoDbCommand::DeleteTable { table } => {
            dynamodb.delete_table(&table).await?;
            out.done(&format!("Deleted table {table}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_parse_json_rejects_garbage() {
        let err = parse_json("{year: 2013}", "key").unwrap_err();
        assert!(matches!(err, SnippetError::InvalidInput(ref m) if m.starts_with("key is not valid JSON")));
    }

    #[test]
    fn test_parse_create_table_defaults() {
        let cli = Cli::try_parse_from([
            "aws-snippets",
            "dynamodb",
            "create-table",
            "Movies",
            "--partition-key",
            "year:N",
            "--wait",
        ])
        .unwrap();

        match cli.command {
            Command::Dynamodb(DynamoDbCommand::CreateTable {
                partition_key,
                sort_key,
                wait,
                wait_secs,
                ..
            }) => {
                assert_eq!(partition_key, KeySpec::number("year"));
                assert!(sort_key.is_none());
                assert!(wait);
                assert_eq!(wait_secs, 120);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

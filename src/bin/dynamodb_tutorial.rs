//! DynamoDB getting-started walkthrough
//!
//! Creates a table, writes and reads a few items, then cleans up.
//!
//! Usage:
//!   cargo run --bin dynamodb_tutorial -- --table Music
//!
//! Against DynamoDB Local:
//!   AWS_ENDPOINT_URL=http://localhost:8000 cargo run --bin dynamodb_tutorial -- --table Music

use anyhow::{Context as _, Result};
use aws_sdk_snippets::{
    config::{AwsConfigBuilder, Settings},
    error::ServiceErrorKind,
    logging::init_tracing,
    services::{DynamoDbService, KeySpec},
};
use clap::Parser;
use serde_json::json;
use std::time::Duration;

/// Walk through the basic DynamoDB item operations
#[derive(Parser, Debug)]
#[command(name = "dynamodb_tutorial")]
struct Args {
    /// Table to create and use
    #[arg(long)]
    table: String,

    /// Endpoint URL (for DynamoDB Local)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Leave the table in place afterwards
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
    let dynamodb = DynamoDbService::new(builder.dynamodb_client(&sdk_config));
    let table = args.table.as_str();

    println!("\n🚀 DynamoDB tutorial using table {table}\n");

    let partition_key = KeySpec::string("artist");
    let sort_key = KeySpec::string("song_title");
    match dynamodb.create_table(table, &partition_key, Some(&sort_key)).await {
        Ok(summary) => println!("✅ Created table: {summary}"),
        Err(e) if e.kind() == Some(ServiceErrorKind::AlreadyExists) => {
            println!("⏭️  Table already exists: {table}")
        }
        Err(e) => return Err(e).context("create table"),
    }

    dynamodb
        .wait_for_table(table, Duration::from_secs(120))
        .await
        .context("wait for table")?;
    println!("✅ Table is active: {}", dynamodb.describe_table(table).await?);

    let songs = [
        json!({"artist": "No One You Know", "song_title": "Call Me Today", "year": 2019, "genre": "Country"}),
        json!({"artist": "No One You Know", "song_title": "Howdy", "year": 2020, "genre": "Country"}),
        json!({"artist": "Acme Band", "song_title": "Happy Day", "year": 2021, "genre": "Rock", "awards": 4}),
    ];
    for song in &songs {
        dynamodb.put_item(table, song).await.context("put item")?;
    }
    println!("✅ Wrote {} items", songs.len());

    let key = json!({"artist": "Acme Band", "song_title": "Happy Day"});
    match dynamodb.get_item(table, &key).await? {
        Some(item) => println!("📄 Got item: {item}"),
        None => println!("❓ Item not found"),
    }

    if let Some(updated) = dynamodb.update_item(table, &key, "awards", &json!(5)).await? {
        println!("✏️  Updated item: {updated}");
    }

    let by_artist = dynamodb
        .query(table, "artist", &json!("No One You Know"))
        .await?;
    println!("🔎 Query returned {} items", by_artist.len());
    for item in &by_artist {
        println!("   {item}");
    }

    println!("🔎 Scan returned {} items", dynamodb.scan(table).await?.len());

    dynamodb.delete_item(table, &key).await?;
    println!("🗑️  Deleted item {key}");

    if args.keep {
        println!("\n✅ Done, table {table} kept\n");
    } else {
        dynamodb.delete_table(table).await.context("delete table")?;
        println!("\n✅ Done, table {table} deleted\n");
    }

    tracing::info!(table, kept = args.keep, "DynamoDB tutorial complete");

    Ok(())
}

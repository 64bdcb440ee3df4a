//! Amazon DynamoDB snippets
//!
//! The classic table tutorial: create a table, add/read/query/update items,
//! then delete everything again. Items are exchanged as JSON (see
//! [`attributes`]).

pub mod attributes;

use aws_sdk_dynamodb::client::Waiters;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ReturnValue,
    ScalarAttributeType, TableDescription,
};
use aws_sdk_dynamodb::Client as DynamoDbSdkClient;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SnippetError};
use attributes::{item_from_json, item_to_json, to_attribute_value};

/// Wrapper around the DynamoDB SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct DynamoDbService {
    client: DynamoDbSdkClient,
}

/// Key attribute of a table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeyAttribute {
    pub name: String,
    /// `HASH` or `RANGE`
    pub key_type: String,
}

/// Key attribute of a table being created: a name and a scalar type.
///
/// Parses from `name` (a string key) or `name:S`, `name:N`, `name:B`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySpec {
    pub name: String,
    pub attribute_type: ScalarAttributeType,
}

impl KeySpec {
    pub fn new(name: impl Into<String>, attribute_type: ScalarAttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ScalarAttributeType::S)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ScalarAttributeType::N)
    }

    fn definition(&self) -> Result<AttributeDefinition> {
        Ok(AttributeDefinition::builder()
            .attribute_name(&self.name)
            .attribute_type(self.attribute_type.clone())
            .build()?)
    }

    fn schema_element(&self, key_type: KeyType) -> Result<KeySchemaElement> {
        Ok(KeySchemaElement::builder()
            .attribute_name(&self.name)
            .key_type(key_type)
            .build()?)
    }
}

impl FromStr for KeySpec {
    type Err = SnippetError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, type_code) = match s.rsplit_once(':') {
            Some((name, code)) => (name, Some(code)),
            None => (s, None),
        };
        if name.trim().is_empty() {
            return Err(SnippetError::invalid_input(format!(
                "key attribute name missing in {s:?}"
            )));
        }

        let attribute_type = match type_code.map(str::to_ascii_uppercase).as_deref() {
            None | Some("S") => ScalarAttributeType::S,
            Some("N") => ScalarAttributeType::N,
            Some("B") => ScalarAttributeType::B,
            Some(other) => {
                return Err(SnippetError::invalid_input(format!(
                    "unknown key type {other:?} for {name}, expected S, N or B"
                )))
            }
        };

        Ok(Self::new(name, attribute_type))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    pub keys: Vec<KeyAttribute>,
}

impl TableSummary {
    fn from_description(table: &TableDescription) -> Self {
        Self {
            name: table.table_name().unwrap_or_default().to_string(),
            status: table.table_status().map(|s| s.as_str().to_string()),
            item_count: table.item_count(),
            keys: table
                .key_schema()
                .iter()
                .map(|k| KeyAttribute {
                    name: k.attribute_name().to_string(),
                    key_type: k.key_type().as_str().to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(status) = &self.status {
            write!(f, "\t{}", status)?;
        }
        if let Some(count) = self.item_count {
            write!(f, "\t{} items", count)?;
        }
        for key in &self.keys {
            write!(f, "\t{} ({})", key.name, key.key_type)?;
        }
        Ok(())
    }
}

impl DynamoDbService {
    pub fn new(client: DynamoDbSdkClient) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying AWS SDK client
    pub fn client(&self) -> &DynamoDbSdkClient {
        &self.client
    }

    /// List all table names, across pages
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        tracing::debug!("Calling DynamoDB ListTables");

        let mut names = self.client.list_tables().into_paginator().items().send();

        let mut tables = Vec::new();
        while let Some(name) = names.next().await {
            tables.push(name?);
        }
        Ok(tables)
    }

    /// Create an on-demand table keyed by `partition_key` and an optional
    /// `sort_key`
    pub async fn create_table(
        &self,
        table: &str,
        partition_key: &KeySpec,
        sort_key: Option<&KeySpec>,
    ) -> Result<TableSummary> {
        tracing::debug!(
            table = %table,
            partition_key = %partition_key.name,
            sort_key = ?sort_key.map(|k| &k.name),
            "Calling DynamoDB CreateTable"
        );

        let mut request = self
            .client
            .create_table()
            .table_name(table)
            .attribute_definitions(partition_key.definition()?)
            .key_schema(partition_key.schema_element(KeyType::Hash)?)
            .billing_mode(BillingMode::PayPerRequest);

        if let Some(sort_key) = sort_key {
            request = request
                .attribute_definitions(sort_key.definition()?)
                .key_schema(sort_key.schema_element(KeyType::Range)?);
        }

        let output = request.send().await?;

        Ok(output
            .table_description()
            .map(TableSummary::from_description)
            .unwrap_or_else(|| TableSummary {
                name: table.to_string(),
                status: None,
                item_count: None,
                keys: Vec::new(),
            }))
    }

    /// Block until the table exists and is active, using the SDK waiter
    pub async fn wait_for_table(&self, table: &str, max_wait: Duration) -> Result<()> {
        tracing::debug!(table = %table, max_wait_secs = max_wait.as_secs(), "Waiting for table");

        self.client
            .wait_until_table_exists()
            .table_name(table)
            .wait(max_wait)
            .await
            .map_err(SnippetError::waiter)?;

        Ok(())
    }

    pub async fn describe_table(&self, table: &str) -> Result<TableSummary> {
        tracing::debug!(table = %table, "Calling DynamoDB DescribeTable");

        let output = self.client.describe_table().table_name(table).send().await?;

        Ok(output
            .table()
            .map(TableSummary::from_description)
            .unwrap_or_else(|| TableSummary {
                name: table.to_string(),
                status: None,
                item_count: None,
                keys: Vec::new(),
            }))
    }

    /// Add (or replace) an item given as a JSON object
    pub async fn put_item(&self, table: &str, item: &Value) -> Result<()> {
        let item = item_from_json(item)?;
        tracing::debug!(table = %table, attributes = item.len(), "Calling DynamoDB PutItem");

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    /// Fetch one item by its full primary key
    pub async fn get_item(&self, table: &str, key: &Value) -> Result<Option<Value>> {
        let key = item_from_json(key)?;
        tracing::debug!(table = %table, "Calling DynamoDB GetItem");

        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await?;

        output.item().map(item_to_json).transpose()
    }

    /// Query every item sharing a partition key value
    pub async fn query(
        &self,
        table: &str,
        partition_key: &str,
        value: &Value,
    ) -> Result<Vec<Value>> {
        tracing::debug!(table = %table, partition_key = %partition_key, "Calling DynamoDB Query");

        let mut items = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", partition_key)
            .expression_attribute_values(":pk", to_attribute_value(value))
            .into_paginator()
            .items()
            .send();

        let mut results = Vec::new();
        while let Some(item) = items.next().await {
            results.push(item_to_json(&item?)?);
        }
        Ok(results)
    }

    /// Read the whole table
    pub async fn scan(&self, table: &str) -> Result<Vec<Value>> {
        tracing::debug!(table = %table, "Calling DynamoDB Scan");

        let mut items = self.client.scan().table_name(table).into_paginator().items().send();

        let mut results = Vec::new();
        while let Some(item) = items.next().await {
            results.push(item_to_json(&item?)?);
        }
        Ok(results)
    }

    /// Set one attribute on an existing item and return the updated item
    pub async fn update_item(
        &self,
        table: &str,
        key: &Value,
        attribute: &str,
        value: &Value,
    ) -> Result<Option<Value>> {
        let key = item_from_json(key)?;
        tracing::debug!(table = %table, attribute = %attribute, "Calling DynamoDB UpdateItem");

        let output = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key))
            .update_expression("SET #attr = :value")
            .expression_attribute_names("#attr", attribute)
            .expression_attribute_values(":value", to_attribute_value(value))
            .return_values(ReturnValue::AllNew)
            .send()
            .await?;

        output.attributes().map(item_to_json).transpose()
    }

    pub async fn delete_item(&self, table: &str, key: &Value) -> Result<()> {
        let key = item_from_json(key)?;
        tracing::debug!(table = %table, "Calling DynamoDB DeleteItem");

        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .send()
            .await?;

        Ok(())
    }

    pub async fn delete_table(&self, table: &str) -> Result<()> {
        tracing::debug!(table = %table, "Calling DynamoDB DeleteTable");
        self.client.delete_table().table_name(table).send().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceErrorKind, SnippetError};
    use aws_sdk_dynamodb::error::ErrorMetadata;
    use aws_sdk_dynamodb::operation::create_table::{CreateTableError, CreateTableOutput};
    use aws_sdk_dynamodb::operation::delete_item::DeleteItemOutput;
    use aws_sdk_dynamodb::operation::delete_table::DeleteTableOutput;
    use aws_sdk_dynamodb::operation::describe_table::DescribeTableOutput;
    use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
    use aws_sdk_dynamodb::operation::list_tables::ListTablesOutput;
    use aws_sdk_dynamodb::operation::put_item::PutItemOutput;
    use aws_sdk_dynamodb::operation::query::QueryOutput;
    use aws_sdk_dynamodb::operation::scan::ScanOutput;
    use aws_sdk_dynamodb::operation::update_item::UpdateItemOutput;
    use aws_sdk_dynamodb::types::error::ResourceInUseException;
    use aws_sdk_dynamodb::types::{AttributeValue, TableStatus};
    use aws_sdk_dynamodb::Client;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use serde_json::json;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_list_tables() {
        let rule = mock!(Client::list_tables).then_output(|| {
            ListTablesOutput::builder()
                .table_names("Movies")
                .table_names("Music")
                .build()
        });
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        let tables = service.list_tables().await.unwrap();

        assert_eq!(tables, ["Movies", "Music"]);
    }

    #[tokio::test]
    async fn test_create_table_with_sort_key() {
        let rule = mock!(Client::create_table)
            .match_requests(|req| {
                let definitions = req.attribute_definitions();
                req.table_name() == Some("Movies")
                    && req.key_schema().len() == 2
                    && req.key_schema()[0].key_type() == &KeyType::Hash
                    && req.key_schema()[1].attribute_name() == "title"
                    && definitions.len() == 2
                    && definitions[0].attribute_name() == "year"
                    && definitions[0].attribute_type() == &ScalarAttributeType::N
                    && definitions[1].attribute_type() == &ScalarAttributeType::S
                    && req.billing_mode() == Some(&BillingMode::PayPerRequest)
            })
            .then_output(|| {
                CreateTableOutput::builder()
                    .table_description(
                        TableDescription::builder()
                            .table_name("Movies")
                            .table_status(TableStatus::Creating)
                            .build(),
                    )
                    .build()
            });
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        let summary = service
            .create_table("Movies", &KeySpec::number("year"), Some(&KeySpec::string("title")))
            .await
            .unwrap();

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(summary.name, "Movies");
        assert_eq!(summary.status.as_deref(), Some("CREATING"));
    }

    #[tokio::test]
    async fn test_create_existing_table_is_already_exists() {
        let rule = mock!(Client::create_table).then_error(|| {
            CreateTableError::ResourceInUseException(
                ResourceInUseException::builder()
                    .meta(
                        ErrorMetadata::builder()
                            .code("ResourceInUseException")
                            .message("Table already exists: Movies")
                            .build(),
                    )
                    .build(),
            )
        });
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        let err = service
            .create_table("Movies", &KeySpec::number("year"), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Some(ServiceErrorKind::AlreadyExists));
        assert_eq!(err.to_string(), "ResourceInUseException: Table already exists: Movies");
    }

    #[tokio::test]
    async fn test_put_item_converts_json() {
        let rule = mock!(Client::put_item)
            .match_requests(|req| {
                let Some(item) = req.item() else { return false };
                req.table_name() == Some("Movies")
                    && item.get("year") == Some(&AttributeValue::N("2015".to_string()))
                    && item.get("title") == Some(&AttributeValue::S("The Big New Movie".to_string()))
            })
            .then_output(|| PutItemOutput::builder().build());
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        service
            .put_item("Movies", &json!({"year": 2015, "title": "The Big New Movie"}))
            .await
            .unwrap();

        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_put_item_rejects_non_object_without_calling() {
        let rule = mock!(Client::put_item).then_output(|| PutItemOutput::builder().build());
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        let err = service.put_item("Movies", &json!("oops")).await.unwrap_err();

        assert!(matches!(err, SnippetError::InvalidInput(_)));
        assert_eq!(rule.num_calls(), 0);
    }

    #[tokio::test]
    async fn test_get_item_found_and_missing() {
        let found = mock!(Client::get_item)
            .match_requests(|req| req.key().map(|k| k.len()) == Some(1))
            .then_output(|| {
                let mut item = HashMap::new();
                item.insert("id".to_string(), AttributeValue::S("42".to_string()));
                item.insert("score".to_string(), AttributeValue::N("9".to_string()));
                GetItemOutput::builder().set_item(Some(item)).build()
            });
        let missing = mock!(Client::get_item).then_output(|| GetItemOutput::builder().build());
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&found, &missing]));

        let item = service.get_item("Scores", &json!({"id": "42"})).await.unwrap();
        assert_eq!(item, Some(json!({"id": "42", "score": 9})));

        let item = service.get_item("Scores", &json!({"id": "43"})).await.unwrap();
        assert_eq!(item, None);
    }

    #[tokio::test]
    async fn test_query_by_partition_key() {
        let rule = mock!(Client::query)
            .match_requests(|req| {
                req.key_condition_expression() == Some("#pk = :pk")
                    && req
                        .expression_attribute_names()
                        .and_then(|names| names.get("#pk"))
                        .map(String::as_str)
                        == Some("year")
                    && req
                        .expression_attribute_values()
                        .and_then(|values| values.get(":pk"))
                        == Some(&AttributeValue::N("2015".to_string()))
            })
            .then_output(|| {
                let mut item = HashMap::new();
                item.insert("year".to_string(), AttributeValue::N("2015".to_string()));
                item.insert("title".to_string(), AttributeValue::S("A".to_string()));
                QueryOutput::builder().items(item).count(1).build()
            });
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        let items = service.query("Movies", "year", &json!(2015)).await.unwrap();

        assert_eq!(items, vec![json!({"year": 2015, "title": "A"})]);
    }

    #[tokio::test]
    async fn test_update_item_returns_new_values() {
        let rule = mock!(Client::update_item)
            .match_requests(|req| {
                req.update_expression() == Some("SET #attr = :value")
                    && req.return_values() == Some(&ReturnValue::AllNew)
            })
            .then_output(|| {
                let mut attrs = HashMap::new();
                attrs.insert("id".to_string(), AttributeValue::S("1".to_string()));
                attrs.insert("rating".to_string(), AttributeValue::N("8".to_string()));
                UpdateItemOutput::builder().set_attributes(Some(attrs)).build()
            });
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        let updated = service
            .update_item("Movies", &json!({"id": "1"}), "rating", &json!(8))
            .await
            .unwrap();

        assert_eq!(updated, Some(json!({"id": "1", "rating": 8})));
    }

    #[tokio::test]
    async fn test_delete_item() {
        let rule = mock!(Client::delete_item)
            .match_requests(|req| req.table_name() == Some("Movies"))
            .then_output(|| DeleteItemOutput::builder().build());
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        service.delete_item("Movies", &json!({"id": "1"})).await.unwrap();

        assert_eq!(rule.num_calls(), 1);
    }

    #[test]
    fn test_key_spec_parsing() {
        assert_eq!("title".parse::<KeySpec>().unwrap(), KeySpec::string("title"));
        assert_eq!("year:N".parse::<KeySpec>().unwrap(), KeySpec::number("year"));
        assert_eq!(
            "blob:b".parse::<KeySpec>().unwrap(),
            KeySpec::new("blob", ScalarAttributeType::B)
        );
        assert!(matches!(
            "year:X".parse::<KeySpec>(),
            Err(SnippetError::InvalidInput(_))
        ));
        assert!(":N".parse::<KeySpec>().is_err());
    }

    fn movies_description(status: TableStatus) -> TableDescription {
        TableDescription::builder()
            .table_name("Movies")
            .table_status(status)
            .item_count(2)
            .key_schema(KeySpec::number("year").schema_element(KeyType::Hash).unwrap())
            .build()
    }

    #[tokio::test]
    async fn test_describe_table() {
        let rule = mock!(Client::describe_table)
            .match_requests(|req| req.table_name() == Some("Movies"))
            .then_output(|| {
                DescribeTableOutput::builder()
                    .table(movies_description(TableStatus::Active))
                    .build()
            });
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        let summary = service.describe_table("Movies").await.unwrap();

        assert_eq!(summary.status.as_deref(), Some("ACTIVE"));
        assert_eq!(summary.item_count, Some(2));
        assert_eq!(
            summary.keys,
            vec![KeyAttribute {
                name: "year".to_string(),
                key_type: "HASH".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_wait_for_active_table_returns_after_one_poll() {
        let rule = mock!(Client::describe_table)
            .match_requests(|req| req.table_name() == Some("Movies"))
            .then_output(|| {
                DescribeTableOutput::builder()
                    .table(movies_description(TableStatus::Active))
                    .build()
            });
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        service
            .wait_for_table("Movies", Duration::from_secs(120))
            .await
            .unwrap();

        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_scan_collects_every_page() {
        let first = mock!(Client::scan)
            .match_requests(|req| req.exclusive_start_key().is_none())
            .then_output(|| {
                let mut item = HashMap::new();
                item.insert("id".to_string(), AttributeValue::S("1".to_string()));
                let mut last = HashMap::new();
                last.insert("id".to_string(), AttributeValue::S("1".to_string()));
                ScanOutput::builder()
                    .items(item)
                    .set_last_evaluated_key(Some(last))
                    .build()
            });
        let second = mock!(Client::scan)
            .match_requests(|req| req.exclusive_start_key().is_some())
            .then_output(|| {
                let mut item = HashMap::new();
                item.insert("id".to_string(), AttributeValue::S("2".to_string()));
                ScanOutput::builder().items(item).build()
            });
        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&first, &second]);
        let service = DynamoDbService::new(client);

        let items = service.scan("Movies").await.unwrap();

        assert_eq!(items, vec![json!({"id": "1"}), json!({"id": "2"})]);
    }

    #[tokio::test]
    async fn test_delete_table() {
        let rule = mock!(Client::delete_table)
            .match_requests(|req| req.table_name() == Some("Movies"))
            .then_output(|| DeleteTableOutput::builder().build());
        let service = DynamoDbService::new(mock_client!(aws_sdk_dynamodb, &[&rule]));

        service.delete_table("Movies").await.unwrap();

        assert_eq!(rule.num_calls(), 1);
    }

    #[test]
    fn test_table_summary_display() {
        let summary = TableSummary {
            name: "Movies".to_string(),
            status: Some("ACTIVE".to_string()),
            item_count: Some(3),
            keys: vec![KeyAttribute {
                name: "year".to_string(),
                key_type: "HASH".to_string(),
            }],
        };

        assert_eq!(summary.to_string(), "Movies\tACTIVE\t3 items\tyear (HASH)");
    }
}

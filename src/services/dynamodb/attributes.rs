//! JSON <-> DynamoDB `AttributeValue` conversion
//!
//! Items and keys cross the CLI boundary as JSON objects. Numbers travel as
//! DynamoDB's string-encoded `N`, binary values come back as base64 strings.
//! `serde_json` is built with `arbitrary_precision`, so a number keeps its
//! exact digits in both directions (DynamoDB allows 38 significant digits).

use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

use crate::error::{Result, SnippetError};

/// A DynamoDB item or key
pub type Item = HashMap<String, AttributeValue>;

/// Convert a JSON value into an attribute value
pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(to_attribute_value).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), to_attribute_value(v)))
                .collect(),
        ),
    }
}

/// Convert a JSON object into an item; anything else is rejected
pub fn item_from_json(value: &Value) -> Result<Item> {
    let Value::Object(map) = value else {
        return Err(SnippetError::invalid_input(format!(
            "expected a JSON object, got: {}",
            value
        )));
    };

    Ok(map
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect())
}

/// Parse a JSON string (as typed on the command line) into an item
pub fn item_from_json_str(raw: &str) -> Result<Item> {
    let value: Value = serde_json::from_str(raw)?;
    item_from_json(&value)
}

/// Convert an attribute value back into JSON
pub fn from_attribute_value(value: &AttributeValue) -> Result<Value> {
    let json = match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::B(blob) => Value::String(STANDARD.encode(blob.as_ref())),
        AttributeValue::Ss(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_>>()?,
        ),
        AttributeValue::Bs(blobs) => Value::Array(
            blobs
                .iter()
                .map(|b| Value::String(STANDARD.encode(b.as_ref())))
                .collect(),
        ),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(from_attribute_value)
                .collect::<Result<_>>()?,
        ),
        AttributeValue::M(map) => Value::Object(item_map_to_json(map)?),
        other => {
            return Err(SnippetError::invalid_input(format!(
                "unsupported attribute value: {:?}",
                other
            )))
        }
    };

    Ok(json)
}

/// Convert a whole item into a JSON object
pub fn item_to_json(item: &Item) -> Result<Value> {
    item_map_to_json(item).map(Value::Object)
}

fn item_map_to_json(item: &Item) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for (name, value) in item {
        map.insert(name.clone(), from_attribute_value(value)?);
    }
    Ok(map)
}

fn parse_number(n: &str) -> Result<Number> {
    n.parse::<Number>()
        .map_err(|_| SnippetError::invalid_input(format!("number out of JSON range: {}", n)))
}

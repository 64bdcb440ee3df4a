//! AWS Lambda snippets

use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{FunctionConfiguration, InvocationType, LogType};
use aws_sdk_lambda::Client as LambdaClient;
use base64::Engine;
use serde::Serialize;
use std::fmt;

use crate::error::{Result, SnippetError};

/// Wrapper around the Lambda SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct LambdaService {
    client: LambdaClient,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FunctionSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    pub memory_mb: Option<i32>,
    pub timeout_secs: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl From<&FunctionConfiguration> for FunctionSummary {
    fn from(config: &FunctionConfiguration) -> Self {
        Self {
            name: config.function_name().unwrap_or_default().to_string(),
            runtime: config.runtime().map(|r| r.as_str().to_string()),
            handler: config.handler().map(str::to_string),
            memory_mb: config.memory_size(),
            timeout_secs: config.timeout(),
            last_modified: config.last_modified().map(str::to_string),
        }
    }
}

impl fmt::Display for FunctionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.name,
            self.runtime.as_deref().unwrap_or("-"),
            self.handler.as_deref().unwrap_or("-")
        )
    }
}

/// Result of a synchronous invocation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvocationResult {
    pub status_code: i32,
    /// Set when the function itself raised (`Handled` / `Unhandled`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_error: Option<String>,
    /// Response payload as text
    pub payload: String,
    /// Last 4 KB of the execution log, decoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tail: Option<String>,
}

impl fmt::Display for InvocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status {}", self.status_code)?;
        if let Some(error) = &self.function_error {
            write!(f, " (function error: {error})")?;
        }
        write!(f, "\n{}", self.payload)?;
        if let Some(tail) = &self.log_tail {
            write!(f, "\n--- log tail ---\n{tail}")?;
        }
        Ok(())
    }
}

impl LambdaService {
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }

    pub async fn list_functions(&self) -> Result<Vec<FunctionSummary>> {
        tracing::debug!("Calling Lambda ListFunctions");

        let mut functions = self.client.list_functions().into_paginator().items().send();

        let mut summaries = Vec::new();
        while let Some(function) = functions.next().await {
            summaries.push(FunctionSummary::from(&function?));
        }
        Ok(summaries)
    }

    pub async fn get_function(&self, name: &str) -> Result<FunctionSummary> {
        tracing::debug!(name = %name, "Calling Lambda GetFunction");

        let output = self.client.get_function().function_name(name).send().await?;

        output
            .configuration()
            .map(FunctionSummary::from)
            .ok_or_else(|| SnippetError::Response(format!("no configuration returned for {name}")))
    }

    /// Invoke a function synchronously with a JSON payload
    ///
    /// The payload is validated as JSON before the call. With `tail_logs`
    /// the base64 log tail from the response is decoded into text.
    pub async fn invoke(
        &self,
        name: &str,
        payload_json: &str,
        tail_logs: bool,
    ) -> Result<InvocationResult> {
        serde_json::from_str::<serde_json::Value>(payload_json)?;

        tracing::debug!(
            name = %name,
            bytes = payload_json.len(),
            tail_logs,
            "Calling Lambda Invoke"
        );

        let log_type = if tail_logs { LogType::Tail } else { LogType::None };

        let output = self
            .client
            .invoke()
            .function_name(name)
            .invocation_type(InvocationType::RequestResponse)
            .log_type(log_type)
            .payload(Blob::new(payload_json.as_bytes()))
            .send()
            .await?;

        let payload = output
            .payload()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
            .unwrap_or_default();

        let log_tail = output.log_result().map(decode_log_tail).transpose()?;

        if let Some(error) = output.function_error() {
            tracing::warn!(name = %name, function_error = %error, "Function returned an error");
        }

        Ok(InvocationResult {
            status_code: output.status_code(),
            function_error: output.function_error().map(str::to_string),
            payload,
            log_tail,
        })
    }
}

fn decode_log_tail(encoded: &str) -> Result<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| SnippetError::Response(format!("invalid log tail encoding: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

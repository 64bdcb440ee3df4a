//! Amazon Bedrock snippets
//!
//! Single-turn prompts through the Converse and ConverseStream APIs, plus
//! listing foundation models on the control-plane client.

use aws_sdk_bedrock::Client as BedrockClient;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ContentBlockDelta, ConversationRole, ConverseStreamOutput,
    InferenceConfiguration, Message, SystemContentBlock, TokenUsage,
};
use aws_sdk_bedrockruntime::Client as BedrockRuntimeClient;
use futures::Stream;
use serde::Serialize;
use std::fmt;
use std::pin::Pin;

use crate::error::Result;

/// Service for the Bedrock runtime (inference) and control-plane clients.
#[derive(Clone, Debug)]
pub struct BedrockService {
    runtime: BedrockRuntimeClient,
    control: BedrockClient,
}

/// A single-turn prompt
#[derive(Debug, Clone)]
pub struct ConverseRequest {
    /// Bedrock model ID or inference profile ID
    pub model_id: String,

    /// User prompt text
    pub prompt: String,

    /// Optional system prompt
    pub system: Option<String>,

    pub max_tokens: Option<i32>,
    pub temperature: Option<f32>,
}

impl ConverseRequest {
    /// Create a new Converse request
    pub fn new(model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            prompt: prompt.into(),
            system: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn user_message(&self) -> Result<Message> {
        Ok(Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(self.prompt.clone()))
            .build()?)
    }

    fn system_blocks(&self) -> Option<Vec<SystemContentBlock>> {
        self.system
            .as_ref()
            .map(|s| vec![SystemContentBlock::Text(s.clone())])
    }

    fn inference_config(&self) -> Option<InferenceConfiguration> {
        if self.max_tokens.is_none() && self.temperature.is_none() {
            return None;
        }
        Some(
            InferenceConfiguration::builder()
                .set_max_tokens(self.max_tokens)
                .set_temperature(self.temperature)
                .build(),
        )
    }
}

/// Token accounting reported by the model
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub total_tokens: i32,
}

impl From<&TokenUsage> for Usage {
    fn from(usage: &TokenUsage) -> Self {
        Self {
            input_tokens: usage.input_tokens(),
            output_tokens: usage.output_tokens(),
            total_tokens: usage.total_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConverseReply {
    pub text: String,
    pub stop_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl fmt::Display for ConverseReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Events surfaced from a ConverseStream response
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A chunk of generated text
    Text(String),
    /// The model stopped generating
    Stop(String),
    /// Final token accounting
    Usage(Usage),
}

/// Stream of events from ConverseStream
pub type ConverseEventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelSummary {
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.model_id,
            self.provider.as_deref().unwrap_or("-"),
            self.name.as_deref().unwrap_or("-")
        )
    }
}

impl BedrockService {
    /// Create a new Bedrock service.
    ///
    /// # Arguments
    /// * `runtime` - Bedrock Runtime client used for inference
    /// * `control` - Bedrock client used for model listing
    pub fn new(runtime: BedrockRuntimeClient, control: BedrockClient) -> Self {
        Self { runtime, control }
    }

    /// List foundation models, optionally for one provider (e.g. `Anthropic`)
    pub async fn list_foundation_models(&self, provider: Option<&str>) -> Result<Vec<ModelSummary>> {
        tracing::debug!(provider = ?provider, "Calling Bedrock ListFoundationModels");

        let output = self
            .control
            .list_foundation_models()
            .set_by_provider(provider.map(str::to_string))
            .send()
            .await?;

        Ok(output
            .model_summaries()
            .iter()
            .map(|m| ModelSummary {
                model_id: m.model_id().to_string(),
                provider: m.provider_name().map(str::to_string),
                name: m.model_name().map(str::to_string),
            })
            .collect())
    }

    /// Send one prompt through the Converse API and collect the text reply
    pub async fn converse(&self, request: ConverseRequest) -> Result<ConverseReply> {
        tracing::debug!(model_id = %request.model_id, "Calling Bedrock Converse API");

        let output = self
            .runtime
            .converse()
            .model_id(&request.model_id)
            .messages(request.user_message()?)
            .set_system(request.system_blocks())
            .set_inference_config(request.inference_config())
            .send()
            .await?;

        let text = output
            .output()
            .and_then(|o| o.as_message().ok())
            .map(|message| {
                message
                    .content()
                    .iter()
                    .filter_map(|block| block.as_text().ok())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        tracing::debug!(stop_reason = ?output.stop_reason(), "Bedrock Converse API call completed");

        Ok(ConverseReply {
            text,
            stop_reason: output.stop_reason().as_str().to_string(),
            usage: output.usage().map(Usage::from),
        })
    }

    /// Send one prompt through the ConverseStream API
    ///
    /// Returns a stream of text deltas followed by the stop reason and usage.
    pub async fn converse_stream(&self, request: ConverseRequest) -> Result<ConverseEventStream> {
        tracing::debug!(model_id = %request.model_id, "Calling Bedrock ConverseStream API");

        let output = self
            .runtime
            .converse_stream()
            .model_id(&request.model_id)
            .messages(request.user_message()?)
            .set_system(request.system_blocks())
            .set_inference_config(request.inference_config())
            .send()
            .await?;

        let mut receiver = output.stream;
        Ok(Box::pin(async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(Some(event)) => {
                        if let Some(event) = stream_event(event) {
                            yield Ok(event);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(e.into());
                        break;
                    }
                }
            }
        }))
    }
}

/// Keep the events a snippet cares about; block start/stop markers are dropped.
fn stream_event(event: ConverseStreamOutput) -> Option<StreamEvent> {
    match event {
        ConverseStreamOutput::ContentBlockDelta(delta) => match delta.delta() {
            Some(ContentBlockDelta::Text(text)) => Some(StreamEvent::Text(text.clone())),
            _ => None,
        },
        ConverseStreamOutput::MessageStop(stop) => {
            Some(StreamEvent::Stop(stop.stop_reason().as_str().to_string()))
        }
        ConverseStreamOutput::Metadata(metadata) => {
            metadata.usage().map(|u| StreamEvent::Usage(Usage::from(u)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrock::operation::list_foundation_models::ListFoundationModelsOutput;
    use aws_sdk_bedrock::types::FoundationModelSummary;
    use aws_sdk_bedrockruntime::error::ErrorMetadata;
    use aws_sdk_bedrockruntime::operation::converse::ConverseOutput;
    use aws_sdk_bedrockruntime::operation::converse_stream::ConverseStreamError;
    use aws_sdk_bedrockruntime::types::error::ValidationException;
    use aws_sdk_bedrockruntime::types::{
        ContentBlockDeltaEvent, ConverseOutput as ConverseOutputUnion, MessageStopEvent, StopReason,
    };
    use crate::error::ServiceErrorKind;
    use aws_smithy_mocks::{mock, mock_client};

    const MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";

    fn reply_message(text: &str) -> Message {
        Message::builder()
            .role(ConversationRole::Assistant)
            .content(ContentBlock::Text(text.to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_converse_request_builder() {
        let request = ConverseRequest::new(MODEL, "Hello")
            .with_system("Be brief")
            .with_max_tokens(256)
            .with_temperature(0.5);

        assert_eq!(request.model_id, MODEL);
        assert_eq!(request.system_blocks().map(|s| s.len()), Some(1));

        let config = request.inference_config().unwrap();
        assert_eq!(config.max_tokens(), Some(256));
        assert_eq!(config.temperature(), Some(0.5));
    }

    #[test]
    fn test_no_inference_config_by_default() {
        let request = ConverseRequest::new(MODEL, "Hello");
        assert!(request.inference_config().is_none());
        assert!(request.system_blocks().is_none());
    }

    #[tokio::test]
    async fn test_converse_collects_text() {
        let rule = mock!(aws_sdk_bedrockruntime::Client::converse)
            .match_requests(|req| {
                req.model_id() == Some(MODEL)
                    && req.messages().len() == 1
                    && req.messages()[0].content()[0].as_text().map(String::as_str) == Ok("Hi there")
            })
            .then_output(|| {
                ConverseOutput::builder()
                    .output(ConverseOutputUnion::Message(reply_message("Hello! How can I help?")))
                    .stop_reason(StopReason::EndTurn)
                    .build()
                    .unwrap()
            });
        let unused = mock!(aws_sdk_bedrock::Client::list_foundation_models)
            .then_output(|| ListFoundationModelsOutput::builder().build());
        let service = BedrockService::new(
            mock_client!(aws_sdk_bedrockruntime, &[&rule]),
            mock_client!(aws_sdk_bedrock, &[&unused]),
        );

        let reply = service.converse(ConverseRequest::new(MODEL, "Hi there")).await.unwrap();

        assert_eq!(reply.text, "Hello! How can I help?");
        assert_eq!(reply.stop_reason, "end_turn");
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_converse_stream_sends_prompt_and_maps_errors() {
        let rule = mock!(aws_sdk_bedrockruntime::Client::converse_stream)
            .match_requests(|req| {
                req.model_id() == Some(MODEL)
                    && req.system().len() == 1
                    && req.inference_config().and_then(|c| c.max_tokens()) == Some(64)
            })
            .then_error(|| {
                ConverseStreamError::ValidationException(
                    ValidationException::builder()
                        .message("The provided model identifier is invalid.")
                        .meta(
                            ErrorMetadata::builder()
                                .code("ValidationException")
                                .message("The provided model identifier is invalid.")
                                .build(),
                        )
                        .build(),
                )
            });
        let unused = mock!(aws_sdk_bedrock::Client::list_foundation_models)
            .then_output(|| ListFoundationModelsOutput::builder().build());
        let service = BedrockService::new(
            mock_client!(aws_sdk_bedrockruntime, &[&rule]),
            mock_client!(aws_sdk_bedrock, &[&unused]),
        );

        let request = ConverseRequest::new(MODEL, "Hi there")
            .with_system("Be brief")
            .with_max_tokens(64);
        let err = match service.converse_stream(request).await {
            Ok(_) => panic!("expected a validation error"),
            Err(err) => err,
        };

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(err.code(), Some("ValidationException"));
        assert_eq!(err.kind(), Some(ServiceErrorKind::Validation));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_list_foundation_models() {
        let rule = mock!(aws_sdk_bedrock::Client::list_foundation_models)
            .match_requests(|req| req.by_provider() == Some("Anthropic"))
            .then_output(|| {
                ListFoundationModelsOutput::builder()
                    .model_summaries(
                        FoundationModelSummary::builder()
                            .model_arn("arn:aws:bedrock:us-east-1::foundation-model/x")
                            .model_id(MODEL)
                            .provider_name("Anthropic")
                            .model_name("Claude 3 Haiku")
                            .build()
                            .unwrap(),
                    )
                    .build()
            });
        let unused = mock!(aws_sdk_bedrockruntime::Client::converse).then_output(|| {
            ConverseOutput::builder()
                .stop_reason(StopReason::EndTurn)
                .build()
                .unwrap()
        });
        let service = BedrockService::new(
            mock_client!(aws_sdk_bedrockruntime, &[&unused]),
            mock_client!(aws_sdk_bedrock, &[&rule]),
        );

        let models = service.list_foundation_models(Some("Anthropic")).await.unwrap();

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].to_string(), format!("{}\tAnthropic\tClaude 3 Haiku", MODEL));
    }

    #[test]
    fn test_stream_event_mapping() {
        let delta = ConverseStreamOutput::ContentBlockDelta(
            ContentBlockDeltaEvent::builder()
                .content_block_index(0)
                .delta(ContentBlockDelta::Text("Hel".to_string()))
                .build()
                .unwrap(),
        );
        assert_eq!(stream_event(delta), Some(StreamEvent::Text("Hel".to_string())));

        let stop = ConverseStreamOutput::MessageStop(
            MessageStopEvent::builder()
                .stop_reason(StopReason::MaxTokens)
                .build()
                .unwrap(),
        );
        assert_eq!(stream_event(stop), Some(StreamEvent::Stop("max_tokens".to_string())));
    }
}

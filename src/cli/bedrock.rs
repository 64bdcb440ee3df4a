//! `aws-snippets bedrock ...`

use clap::{Args, Subcommand};
use futures::StreamExt;

use super::Context;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::services::{ConverseReply, ConverseRequest, StreamEvent};

#[derive(Subcommand, Debug)]
pub enum BedrockCommand {
    /// List foundation models
    ListModels {
        /// Only models from this provider, e.g. Anthropic
        #[arg(long)]
        provider: Option<String>,
    },

    /// Send one prompt with the Converse API
    Converse(ConverseArgs),

    /// Send one prompt with ConverseStream and print text as it arrives
    ConverseStream(ConverseArgs),
}

#[derive(Args, Debug)]
pub struct ConverseArgs {
    prompt: String,

    /// Defaults to BEDROCK_MODEL_ID
    #[arg(long)]
    model_id: Option<String>,

    #[arg(long)]
    system: Option<String>,

    #[arg(long)]
    max_tokens: Option<i32>,

    #[arg(long)]
    temperature: Option<f32>,
}

impl ConverseArgs {
    fn into_request(self, default_model: &str) -> ConverseRequest {
        let mut request =
            ConverseRequest::new(self.model_id.as_deref().unwrap_or(default_model), self.prompt);
        if let Some(system) = self.system {
            request = request.with_system(system);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}

pub async fn run(command: BedrockCommand, ctx: &Context) -> Result<()> {
    let bedrock = ctx.bedrock();
    let out = &ctx.output;

    match command {
        BedrockCommand::ListModels { provider } => {
            out.emit_list(&bedrock.list_foundation_models(provider.as_deref()).await?)
        }
        BedrockCommand::Converse(args) => {
            let request = args.into_request(&ctx.settings.bedrock_model_id);
            out.emit(&bedrock.converse(request).await?)
        }
        BedrockCommand::ConverseStream(args) => {
            let request = args.into_request(&ctx.settings.bedrock_model_id);
            let mut stream = bedrock.converse_stream(request).await?;

            let echo = out.format() == OutputFormat::Text;
            let mut reply = ConverseReply {
                text: String::new(),
                stop_reason: String::new(),
                usage: None,
            };

            while let Some(event) = stream.next().await {
                match event? {
                    StreamEvent::Text(text) => {
                        if echo {
                            out.stream_text(&text)?;
                        }
                        reply.text.push_str(&text);
                    }
                    StreamEvent::Stop(reason) => reply.stop_reason = reason,
                    StreamEvent::Usage(usage) => reply.usage = Some(usage),
                }
            }

            tracing::info!(
                stop_reason = %reply.stop_reason,
                output_tokens = reply.usage.map(|u| u.output_tokens),
                "Stream finished"
            );

            if echo {
                out.end_stream()
            } else {
                out.emit(&reply)
            }
        }
    }
}

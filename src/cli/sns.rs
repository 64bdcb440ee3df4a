//! `aws-snippets sns ...`

use clap::Subcommand;

use super::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum SnsCommand {
    ListTopics,

    CreateTopic { name: String },

    /// Publish a message to a topic
    Publish {
        topic_arn: String,
        message: String,
        #[arg(long)]
        subject: Option<String>,
    },

    /// Subscribe an endpoint to a topic
    Subscribe {
        topic_arn: String,
        /// email, sqs, lambda, https, ...
        protocol: String,
        endpoint: String,
    },

    DeleteTopic { topic_arn: String },
}

pub async fn run(command: SnsCommand, ctx: &Context) -> Result<()> {
    let sns = ctx.sns();
    let out = &ctx.output;

    match command {
        SnsCommand::ListTopics => out.emit_list(&sns.list_topics().await?),
        SnsCommand::CreateTopic { name } => out.emit(&sns.create_topic(&name).await?),
        SnsCommand::Publish {
            topic_arn,
            message,
            subject,
        } => out.emit(
            &sns.publish(&topic_arn, &message, subject.as_deref())
                .await?,
        ),
        SnsCommand::Subscribe {
            topic_arn,
            protocol,
            endpoint,
        } => out.emit(&sns.subscribe(&topic_arn, &protocol, &endpoint).await?),
        SnsCommand::DeleteTopic { topic_arn } => {
            sns.delete_topic(&topic_arn).await?;
            out.done(&format!("Deleted topic {topic_arn}"))
        }
    }
}

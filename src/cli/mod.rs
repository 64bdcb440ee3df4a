//! Command-line interface
//!
//! `aws-snippets [global flags] <service> <snippet> [args]`. Every snippet
//! subcommand maps to exactly one service method.

pub mod acm;
pub mod bedrock;
pub mod dynamodb;
pub mod iam;
pub mod kinesis;
pub mod lambda;
pub mod output;
pub mod s3;
pub mod sns;
pub mod sts;

use aws_config::SdkConfig;
use clap::{Parser, Subcommand};

use crate::config::{
    build_aws_config, AwsConfigBuilder, LogFormat, OutputFormat, Settings, DEFAULT_REGION,
};
use crate::error::Result;
use crate::services::{
    AcmService, BedrockService, DynamoDbService, IamService, KinesisService, LambdaService,
    S3Service, SnsService, StsService,
};
pub use output::Output;

/// AWS SDK snippets
///
/// Small, self-contained calls against AWS services.
#[derive(Parser, Debug)]
#[command(name = "aws-snippets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// AWS region (overrides AWS_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Named profile from the shared AWS config (overrides AWS_PROFILE)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Send every request to this endpoint, e.g. http://localhost:4566
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Log level or filter directives (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format on stderr (overrides LOG_FORMAT)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Result format on stdout (overrides OUTPUT_FORMAT)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Amazon S3
    #[command(subcommand)]
    S3(s3::S3Command),

    /// Amazon DynamoDB
    #[command(subcommand)]
    Dynamodb(dynamodb::DynamoDbCommand),

    /// Amazon SNS
    #[command(subcommand)]
    Sns(sns::SnsCommand),

    /// AWS STS
    #[command(subcommand)]
    Sts(sts::StsCommand),

    /// AWS Certificate Manager
    #[command(subcommand)]
    Acm(acm::AcmCommand),

    /// Amazon Bedrock
    #[command(subcommand)]
    Bedrock(bedrock::BedrockCommand),

    /// Amazon Kinesis Data Streams
    #[command(subcommand)]
    Kinesis(kinesis::KinesisCommand),

    /// AWS IAM
    #[command(subcommand)]
    Iam(iam::IamCommand),

    /// AWS Lambda
    #[command(subcommand)]
    Lambda(lambda::LambdaCommand),
}

impl Command {
    /// Service group name, used in logs
    pub fn service(&self) -> &'static str {
        match self {
            Command::S3(_) => "s3",
            Command::Dynamodb(_) => "dynamodb",
            Command::Sns(_) => "sns",
            Command::Sts(_) => "sts",
            Command::Acm(_) => "acm",
            Command::Bedrock(_) => "bedrock",
            Command::Kinesis(_) => "kinesis",
            Command::Iam(_) => "iam",
            Command::Lambda(_) => "lambda",
        }
    }
}

impl Cli {
    /// Apply CLI overrides on top of environment settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(region) = &self.region {
            settings.aws_region = Some(region.clone());
        }
        if let Some(profile) = &self.profile {
            settings.aws_profile = Some(profile.clone());
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            settings.endpoint_url = Some(endpoint_url.clone());
        }
        if let Some(log_level) = &self.log_level {
            settings.log_level = log_level.clone();
        }
        if let Some(log_format) = self.log_format {
            settings.log_format = log_format;
        }
        if let Some(output) = self.output {
            settings.output_format = output;
        }
    }
}

/// Resolved configuration shared by every snippet of one invocation
pub struct Context {
    pub settings: Settings,
    pub sdk_config: SdkConfig,
    pub output: Output,
}

impl Context {
    pub async fn new(settings: Settings) -> Self {
        let sdk_config = build_aws_config(&settings).await;
        let output = Output::new(settings.output_format);
        Self {
            settings,
            sdk_config,
            output,
        }
    }

    fn clients(&self) -> AwsConfigBuilder<'_> {
        AwsConfigBuilder::new(&self.settings)
    }

    /// Region the SDK resolved: the configured one, else the provider
    /// chain's (e.g. the profile's), else `us-east-1`
    pub fn region(&self) -> &str {
        match self.sdk_config.region() {
            Some(region) => region.as_ref(),
            None => DEFAULT_REGION,
        }
    }

    pub fn s3(&self) -> S3Service {
        S3Service::new(self.clients().s3_client(&self.sdk_config))
    }

    pub fn dynamodb(&self) -> DynamoDbService {
        DynamoDbService::new(self.clients().dynamodb_client(&self.sdk_config))
    }

    pub fn sns(&self) -> SnsService {
        SnsService::new(self.clients().sns_client(&self.sdk_config))
    }

    pub fn sts(&self) -> StsService {
        StsService::new(self.clients().sts_client(&self.sdk_config))
    }

    pub fn acm(&self) -> AcmService {
        AcmService::new(self.clients().acm_client(&self.sdk_config))
    }

    pub fn bedrock(&self) -> BedrockService {
        BedrockService::new(
            self.clients().bedrock_runtime_client(&self.sdk_config),
            self.clients().bedrock_client(&self.sdk_config),
        )
    }

    pub fn kinesis(&self) -> KinesisService {
        KinesisService::new(self.clients().kinesis_client(&self.sdk_config))
    }

    pub fn iam(&self) -> IamService {
        IamService::new(self.clients().iam_client(&self.sdk_config))
    }

    pub fn lambda(&self) -> LambdaService {
        LambdaService::new(self.clients().lambda_client(&self.sdk_config))
    }
}

/// Run one snippet
pub async fn run(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::S3(cmd) => s3::run(cmd, ctx).await,
        Command::Dynamodb(cmd) => dynamodb::run(cmd, ctx).await,
        Command::Sns(cmd) => sns::run(cmd, ctx).await,
        Command::Sts(cmd) => sts::run(cmd, ctx).await,
        Command::Acm(cmd) => acm::run(cmd, ctx).await,
        Command::Bedrock(cmd) => bedrock::run(cmd, ctx).await,
        Command::Kinesis(cmd) => kinesis::run(cmd, ctx).await,
        Command::Iam(cmd) => iam::run(cmd, ctx).await,
        Command::Lambda(cmd) => lambda::run(cmd, ctx).await,
    }
}

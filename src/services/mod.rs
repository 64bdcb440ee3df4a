//! Services module
//!
//! One thin wrapper per AWS service. Each method issues a single SDK call
//! (or walks a paginator) and returns plain, printable summaries.

pub mod acm;
pub mod bedrock;
pub mod dynamodb;
pub mod iam;
pub mod kinesis;
pub mod lambda;
pub mod s3;
pub mod sns;
pub mod sts;

pub use acm::{AcmService, CertificateDetails, CertificateSummary};
pub use bedrock::{
    BedrockService, ConverseEventStream, ConverseReply, ConverseRequest, ModelSummary,
    StreamEvent, Usage,
};
pub use dynamodb::{DynamoDbService, KeyAttribute, KeySpec, TableSummary};
pub use iam::{IamService, PrincipalSummary};
pub use kinesis::{KinesisService, RecordReceipt, StreamSummary};
pub use lambda::{FunctionSummary, InvocationResult, LambdaService};
pub use s3::{BucketSummary, DownloadedObject, ObjectSummary, PutObjectSummary, S3Service};
pub use sns::{PublishReceipt, SnsService};
pub use sts::{AssumedRole, CallerIdentity, StsService};

//! `aws-snippets acm ...`

use aws_sdk_acm::types::ValidationMethod;
use clap::{Subcommand, ValueEnum};

use super::Context;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Validation {
    Dns,
    Email,
}

impl From<Validation> for ValidationMethod {
    fn from(value: Validation) -> Self {
        match value {
            Validation::Dns => ValidationMethod::Dns,
            Validation::Email => ValidationMethod::Email,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum AcmCommand {
    ListCertificates,

    DescribeCertificate { certificate_arn: String },

    /// Request a public certificate
    RequestCertificate {
        domain_name: String,
        /// Additional names on the certificate (repeatable)
        #[arg(long = "san")]
        subject_alternative_names: Vec<String>,
        #[arg(long, value_enum, default_value_t = Validation::Dns)]
        validation: Validation,
    },

    DeleteCertificate { certificate_arn: String },
}

pub async fn run(command: AcmCommand, ctx: &Context) -> Result<()> {
    let acm = ctx.acm();
    let out = &ctx.output;

    match command {
        AcmCommand::ListCertificates => out.emit_list(&acm.list_certificates().await?),
        AcmCommand::DescribeCertificate { certificate_arn } => {
            out.emit(&acm.describe_certificate(&certificate_arn).await?)
        }
        AcmCommand::RequestCertificate {
            domain_name,
            subject_alternative_names,
            validation,
        } => out.emit(
            &acm.request_certificate(&domain_name, &subject_alternative_names, validation.into())
                .await?,
        ),
        AcmCommand::DeleteCertificate { certificate_arn } => {
            acm.delete_certificate(&certificate_arn).await?;
            out.done(&format!("Deleted certificate {certificate_arn}"))
        }
    }
}

//! AWS Certificate Manager snippets

use aws_sdk_acm::types::ValidationMethod;
use aws_sdk_acm::Client as AcmClient;
use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::utils::format_opt;

/// Wrapper around the ACM SDK client, one method per snippet.
#[derive(Clone, Debug)]
pub struct AcmService {
    client: AcmClient,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CertificateSummary {
    pub certificate_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl fmt::Display for CertificateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.domain_name.as_deref().unwrap_or("-"),
            self.status.as_deref().unwrap_or("-"),
            self.certificate_arn
        )
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CertificateDetails {
    pub certificate_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub subject_alternative_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_after: Option<String>,
}

impl fmt::Display for CertificateDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ARN: {}", self.certificate_arn)?;
        writeln!(f, "Domain: {}", self.domain_name.as_deref().unwrap_or("-"))?;
        writeln!(f, "Status: {}", self.status.as_deref().unwrap_or("-"))?;
        writeln!(f, "SANs: {}", self.subject_alternative_names.join(", "))?;
        writeln!(f, "Issuer: {}", self.issuer.as_deref().unwrap_or("-"))?;
        write!(f, "Not after: {}", self.not_after.as_deref().unwrap_or("-"))
    }
}

impl AcmService {
    pub fn new(client: AcmClient) -> Self {
        Self { client }
    }

    pub async fn list_certificates(&self) -> Result<Vec<CertificateSummary>> {
        tracing::debug!("Calling ACM ListCertificates");

        let mut summaries = self.client.list_certificates().into_paginator().items().send();

        let mut certificates = Vec::new();
        while let Some(summary) = summaries.next().await {
            let summary = summary?;
            certificates.push(CertificateSummary {
                certificate_arn: summary.certificate_arn().unwrap_or_default().to_string(),
                domain_name: summary.domain_name().map(str::to_string),
                status: summary.status().map(|s| s.as_str().to_string()),
            });
        }
        Ok(certificates)
    }

    pub async fn describe_certificate(&self, certificate_arn: &str) -> Result<CertificateDetails> {
        tracing::debug!(certificate_arn = %certificate_arn, "Calling ACM DescribeCertificate");

        let output = self
            .client
            .describe_certificate()
            .certificate_arn(certificate_arn)
            .send()
            .await?;

        let detail = output.certificate();
        Ok(CertificateDetails {
            certificate_arn: certificate_arn.to_string(),
            domain_name: detail.and_then(|d| d.domain_name()).map(str::to_string),
            status: detail.and_then(|d| d.status()).map(|s| s.as_str().to_string()),
            subject_alternative_names: detail
                .map(|d| d.subject_alternative_names().to_vec())
                .unwrap_or_default(),
            issuer: detail.and_then(|d| d.issuer()).map(str::to_string),
            not_after: format_opt(detail.and_then(|d| d.not_after())),
        })
    }

    /// Request a public certificate and return its ARN
    pub async fn request_certificate(
        &self,
        domain_name: &str,
        subject_alternative_names: &[String],
        validation: ValidationMethod,
    ) -> Result<String> {
        tracing::debug!(
            domain_name = %domain_name,
            sans = subject_alternative_names.len(),
            validation = %validation.as_str(),
            "Calling ACM RequestCertificate"
        );

        let sans = (!subject_alternative_names.is_empty()).then(|| subject_alternative_names.to_vec());

        let output = self
            .client
            .request_certificate()
            .domain_name(domain_name)
            .validation_method(validation)
            .set_subject_alternative_names(sans)
            .send()
            .await?;

        Ok(output.certificate_arn().unwrap_or_default().to_string())
    }

    pub async fn delete_certificate(&self, certificate_arn: &str) -> Result<()> {
        tracing::debug!(certificate_arn = %certificate_arn, "Calling ACM DeleteCertificate");
        self.client
            .delete_certificate()
            .certificate_arn(certificate_arn)
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_acm::operation::delete_certificate::DeleteCertificateOutput;
    use aws_sdk_acm::operation::describe_certificate::DescribeCertificateOutput;
    use aws_sdk_acm::operation::list_certificates::ListCertificatesOutput;
    use aws_sdk_acm::operation::request_certificate::RequestCertificateOutput;
    use aws_sdk_acm::types::{CertificateDetail, CertificateStatus, CertificateSummary as SdkSummary};
    use aws_sdk_acm::Client;
    use aws_smithy_mocks::{mock, mock_client};

    const CERT_ARN: &str = "arn:aws:acm:us-east-1:123456789012:certificate/abc";

    #[tokio::test]
    async fn test_list_certificates() {
        let rule = mock!(Client::list_certificates).then_output(|| {
            ListCertificatesOutput::builder()
                .certificate_summary_list(
                    SdkSummary::builder()
                        .certificate_arn(CERT_ARN)
                        .domain_name("example.com")
                        .status(CertificateStatus::Issued)
                        .build(),
                )
                .build()
        });
        let service = AcmService::new(mock_client!(aws_sdk_acm, &[&rule]));

        let certificates = service.list_certificates().await.unwrap();

        assert_eq!(certificates.len(), 1);
        assert_eq!(certificates[0].to_string(), format!("example.com\tISSUED\t{}", CERT_ARN));
    }

    #[tokio::test]
    async fn test_describe_certificate() {
        let rule = mock!(Client::describe_certificate)
            .match_requests(|req| req.certificate_arn() == Some(CERT_ARN))
            .then_output(|| {
                DescribeCertificateOutput::builder()
                    .certificate(
                        CertificateDetail::builder()
                            .certificate_arn(CERT_ARN)
                            .domain_name("example.com")
                            .subject_alternative_names("example.com")
                            .subject_alternative_names("www.example.com")
                            .status(CertificateStatus::PendingValidation)
                            .build(),
                    )
                    .build()
            });
        let service = AcmService::new(mock_client!(aws_sdk_acm, &[&rule]));

        let details = service.describe_certificate(CERT_ARN).await.unwrap();

        assert_eq!(details.status.as_deref(), Some("PENDING_VALIDATION"));
        assert_eq!(details.subject_alternative_names, ["example.com", "www.example.com"]);
        assert_eq!(rule.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_request_certificate_without_sans() {
        let rule = mock!(Client::request_certificate)
            .match_requests(|req| {
                req.domain_name() == Some("example.com")
                    && req.validation_method() == Some(&ValidationMethod::Dns)
                    && req.subject_alternative_names().is_empty()
            })
            .then_output(|| RequestCertificateOutput::builder().certificate_arn(CERT_ARN).build());
        let service = AcmService::new(mock_client!(aws_sdk_acm, &[&rule]));

        let arn = service
            .request_certificate("example.com", &[], ValidationMethod::Dns)
            .await
            .unwrap();

        assert_eq!(arn, CERT_ARN);
    }

    #[tokio::test]
    async fn test_delete_certificate() {
        let rule = mock!(Client::delete_certificate)
            .match_requests(|req| req.certificate_arn() == Some(CERT_ARN))
            .then_output(|| DeleteCertificateOutput::builder().build());
        let service = AcmService::new(mock_client!(aws_sdk_acm, &[&rule]));

        service.delete_certificate(CERT_ARN).await.unwrap();

        assert_eq!(rule.num_calls(), 1);
    }
}

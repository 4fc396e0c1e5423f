//! # `metasync-soap`: SOAP Metadata API Backend
//!
//! This crate talks to the org's SOAP Metadata API and exposes it to the core
//! `metasync` pipeline by implementing the `MetadataReader` trait. Requests and
//! responses are built and decoded with the core crate's XML support.

mod envelope;

pub use envelope::{
    build_envelope, decode_list_response, decode_read_response, list_metadata_payload,
    read_metadata_payload, SOAP_ENV_NAMESPACE,
};

use async_trait::async_trait;
use metasync::constants::{BATCH_LIMIT, DEFAULT_API_VERSION};
use metasync::xml::XmlElement;
use metasync::{MetadataError, MetadataReader, ReadResult, XmlError};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum SoapError {
    #[error("Invalid SOAP client configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to reach the Metadata API: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Metadata API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },
    #[error("Unexpected SOAP response: {0}")]
    Decode(String),
    #[error("SOAP XML error: {0}")]
    Xml(#[from] XmlError),
}

/// A helper to convert the specific `SoapError` into the generic `metasync::MetadataError`.
impl From<SoapError> for MetadataError {
    fn from(err: SoapError) -> Self {
        match err {
            SoapError::Fault { code, message } => {
                MetadataError::Rejected(format!("{code}: {message}"))
            }
            SoapError::Decode(msg) => MetadataError::Decode(msg),
            SoapError::Xml(e) => MetadataError::Decode(e.to_string()),
            other => MetadataError::Call(other.to_string()),
        }
    }
}

// --- Configuration ---

/// Connection settings for one org.
#[derive(Debug, Clone, Deserialize)]
pub struct SoapConfig {
    /// The org's instance URL, e.g. `https://example.my.salesforce.com`.
    pub instance_url: String,
    /// A valid session id / OAuth access token.
    pub access_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

// --- Client ---

/// A `MetadataReader` backed by the SOAP Metadata API.
pub struct SoapMetadataClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl SoapMetadataClient {
    /// Creates a client for the org described by `config`.
    pub fn new(config: &SoapConfig) -> Result<Self, SoapError> {
        if config.instance_url.trim().is_empty() {
            return Err(SoapError::InvalidConfig("instance_url is empty".into()));
        }
        if config.access_token.trim().is_empty() {
            return Err(SoapError::InvalidConfig("access_token is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let endpoint = format!(
            "{}/services/Soap/m/{}",
            config.instance_url.trim_end_matches('/'),
            config.api_version
        );

        Ok(Self {
            client,
            endpoint,
            access_token: config.access_token.clone(),
        })
    }

    /// The SOAP endpoint every request is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one SOAP request and returns the content of the response `Body`.
    async fn call(&self, action: &str, payload: XmlElement) -> Result<XmlElement, SoapError> {
        let request = build_envelope(&self.access_token, payload)?;
        debug!("POST {} ({})", self.endpoint, action);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(construct_headers(action)?)
            .body(request)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed = envelope::response_body(&text);
        if status.is_success() {
            return parsed;
        }
        // Faults come back with a 500 status but still carry a readable envelope.
        match parsed {
            Err(fault @ SoapError::Fault { .. }) => Err(fault),
            _ => Err(SoapError::Status {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

fn construct_headers(action: &str) -> Result<HeaderMap, SoapError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/xml; charset=UTF-8"),
    );
    headers.insert(
        "SOAPAction",
        HeaderValue::from_str(action)
            .map_err(|e| SoapError::InvalidConfig(format!("Invalid SOAP action: {e}")))?,
    );
    Ok(headers)
}

#[async_trait]
impl MetadataReader for SoapMetadataClient {
    async fn read(&self, record_type: &str, names: &[String]) -> Result<ReadResult, MetadataError> {
        if names.len() > BATCH_LIMIT {
            return Err(MetadataError::TooManyNames {
                limit: BATCH_LIMIT,
                requested: names.len(),
            });
        }

        let body = self
            .call("readMetadata", read_metadata_payload(record_type, names))
            .await?;
        let result = decode_read_response(&body)?;
        info!(
            "readMetadata returned {} record(s) for {} name(s)",
            match &result {
                ReadResult::One(_) => 1,
                ReadResult::Many(records) => records.len(),
            },
            names.len()
        );
        Ok(result)
    }

    async fn list(&self, record_type: &str) -> Result<Vec<String>, MetadataError> {
        let body = self
            .call("listMetadata", list_metadata_payload(record_type))
            .await?;
        let names = decode_list_response(&body)?;
        info!("listMetadata returned {} {} name(s)", names.len(), record_type);
        Ok(names)
    }
}

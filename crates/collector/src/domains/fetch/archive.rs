use async_trait::async_trait;
use reqwest::Client;
use slog::{debug, Logger};
use std::time::Duration;

use crate::{FetchError, Span};

pub const DEFAULT_ARCHIVE_URL: &str = "https://mesonet.agron.iastate.edu/cgi-bin/request/asos.py";

/// One upstream call: a group of networks over one contiguous span.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionRequest {
    pub networks: Vec<String>,
    pub span: Span,
}

impl PartitionRequest {
    pub fn label(&self) -> String {
        format!(
            "{} {}..{}",
            self.networks.join(","),
            self.span.start.date(),
            self.span.end.date()
        )
    }

    /// Query string for the mesonet `asos.py` endpoint. The archive takes whole
    /// UTC days, so only the dates of the span are sent.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let start = self.span.start.date();
        let end = self.span.end.date();

        let mut pairs: Vec<(&'static str, String)> = self
            .networks
            .iter()
            .map(|network| ("network", network.clone()))
            .collect();
        pairs.extend([
            ("data", String::from("all")),
            ("tz", String::from("Etc/UTC")),
            ("format", String::from("onlycomma")),
            ("latlon", String::from("yes")),
            ("missing", String::from("null")),
            ("trace", String::from("T")),
            ("year1", start.year().to_string()),
            ("month1", u8::from(start.month()).to_string()),
            ("day1", start.day().to_string()),
            ("year2", end.year().to_string()),
            ("month2", u8::from(end.month()).to_string()),
            ("day2", end.day().to_string()),
        ]);
        pairs
    }
}

/// Source of raw observation payloads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    async fn fetch(&self, request: &PartitionRequest) -> Result<String, FetchError>;
}

pub struct MesonetClient {
    logger: Logger,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl MesonetClient {
    pub fn new(
        logger: Logger,
        base_url: String,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            logger,
            client,
            base_url,
            timeout,
        })
    }
}

#[async_trait]
impl ArchiveClient for MesonetClient {
    async fn fetch(&self, request: &PartitionRequest) -> Result<String, FetchError> {
        debug!(self.logger, "requesting: {} {}", self.base_url, request.label());
        let response = self
            .client
            .get(&self.base_url)
            .query(&request.query_pairs())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

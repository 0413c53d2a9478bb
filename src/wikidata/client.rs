//! HTTP client for the Wikidata SPARQL endpoint.
//!
//! Uses reqwest with a form-encoded POST. Single attempt per call: no retry and
//! no timeout beyond the client defaults.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{PEOPLE_HEIGHT_QUERY, USER_AGENT, WIKIDATA_SPARQL_URL};
use crate::error::UpdateError;

/// SPARQL JSON results document.
///
/// Members are optional so a structurally broken payload still decodes and the
/// extractor can report what is missing. Rows stay raw JSON for the same reason:
/// one odd row must not fail the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparqlResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<SparqlHead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<SparqlResults>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<Vec<serde_json::Value>>,
}

/// One typed cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTerm {
    #[serde(rename = "type")]
    pub term_type: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// One result row of the people/height query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBinding {
    pub item: Option<RawTerm>,
    pub item_label: Option<RawTerm>,
    pub item_description: Option<RawTerm>,
    pub image: Option<RawTerm>,
    pub height_value: Option<RawTerm>,
    pub height_unit_label: Option<RawTerm>,
    pub sitelinks: Option<RawTerm>,
}

/// Where an updater run gets its raw rows from.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<SparqlResponse, UpdateError>;
}

pub struct WikidataClient {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for WikidataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WikidataClient {
    pub fn new() -> Self {
        Self::with_endpoint(WIKIDATA_SPARQL_URL)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    /// `query=<urlencoded SPARQL>`
    fn request_body() -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("query", PEOPLE_HEIGHT_QUERY)
            .finish()
    }
}

#[async_trait]
impl DataSource for WikidataClient {
    async fn fetch(&self) -> Result<SparqlResponse, UpdateError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/sparql-results+json")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("User-Agent", USER_AGENT)
            .body(Self::request_body())
            .send()
            .await
            .map_err(|e| {
                log::error!("Wikidata request failed: {}", e);
                UpdateError::Network(e.to_string())
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            log::error!("Wikidata request failed with status {}", status);
            return Err(UpdateError::FetchStatus(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| {
            log::error!("Reading Wikidata response failed: {}", e);
            UpdateError::Network(e.to_string())
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            log::error!("Wikidata response is not valid JSON: {}", e);
            UpdateError::Decode(e.to_string())
        })
    }
}

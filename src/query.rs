//! GraphQL query executor: one blocking request per comment page.

use crate::error::{ScrapeError, ScrapeResult};
use crate::media::MediaRef;
use crate::session::{build_headers, Session};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Query hash selecting the "parent comments of a shortcode media" query.
pub const PARENT_QUERY_HASH: &str = "97b41c52301f77ce508f55e66d17620e";

const DEFAULT_BASE_URL: &str = "https://www.instagram.com/graphql/query/";
const BODY_SNIPPET_CHARS: usize = 300;

/// Variables object of a page request. Serialized compactly; `after` is
/// omitted on the first page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryVariables {
    pub shortcode: String,
    pub first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl QueryVariables {
    pub fn to_compact_json(&self) -> String {
        // A struct of strings and integers always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Fetches one page of the comment query. Implementations keep no state
/// between calls; every failure is fatal to the run.
pub trait QueryExecutor {
    fn fetch_page(&self, vars: &QueryVariables) -> ScrapeResult<Value>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn fetch_page(&self, vars: &QueryVariables) -> ScrapeResult<Value> {
        (**self).fetch_page(vars)
    }
}

/// Blocking HTTP executor against the public GraphQL endpoint.
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    query_hash: String,
}

impl GraphqlClient {
    /// Builds a client carrying the session cookies and the referer of `media`.
    pub fn new(session: &Session, media: &MediaRef) -> ScrapeResult<Self> {
        Self::with_options(session, media, DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    pub fn with_options(
        session: &Session,
        media: &MediaRef,
        base_url: &str,
        timeout: Duration,
    ) -> ScrapeResult<Self> {
        let headers = build_headers(&media.referer_url(), session)?;
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            endpoint: base_url.to_string(),
            query_hash: PARENT_QUERY_HASH.to_string(),
        })
    }

    pub fn with_query_hash(mut self, hash: impl Into<String>) -> Self {
        self.query_hash = hash.into();
        self
    }
}

impl QueryExecutor for GraphqlClient {
    fn fetch_page(&self, vars: &QueryVariables) -> ScrapeResult<Value> {
        let variables = vars.to_compact_json();
        tracing::debug!(endpoint = %self.endpoint, %variables, "graphql request");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("query_hash", self.query_hash.as_str()), ("variables", variables.as_str())])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                body_snippet: body.chars().take(BODY_SNIPPET_CHARS).collect(),
            });
        }
        parse_body(&body)
    }
}

/// Parse a response body, mapping invalid JSON to `MalformedResponse`.
pub fn parse_body(body: &str) -> ScrapeResult<Value> {
    serde_json::from_str(body).map_err(|e| ScrapeError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_are_compact_and_skip_missing_cursor() {
        let first = QueryVariables { shortcode: "ABC".into(), first: 50, after: None };
        assert_eq!(first.to_compact_json(), r#"{"shortcode":"ABC","first":50}"#);
        let next = QueryVariables { after: Some("QVFD".into()), ..first };
        assert_eq!(next.to_compact_json(), r#"{"shortcode":"ABC","first":50,"after":"QVFD"}"#);
    }

    #[test]
    fn html_body_is_malformed() {
        let err = parse_body("<!DOCTYPE html><html>login</html>").unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedResponse(_)));
        assert!(parse_body(r#"{"data":null}"#).is_ok());
    }
}

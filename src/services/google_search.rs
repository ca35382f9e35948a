use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{configuration::SearchSettings, domain::SearchResult};

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
const RESULTS_PER_QUERY: u8 = 10;
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GoogleSearchClient {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
    date_restrict: Option<String>,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    key: &'a str,
    cx: &'a str,
    q: &'a str,
    num: u8,
    sort: &'a str,
    #[serde(rename = "dateRestrict", skip_serializing_if = "Option::is_none")]
    date_restrict: Option<&'a str>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

impl GoogleSearchClient {
    /// `None` when the API key or engine id is not configured; the caller is
    /// expected to log and run without search rather than crash.
    pub fn from_settings(settings: &SearchSettings) -> Option<Self> {
        let api_key = settings.api_key.clone()?;
        let engine_id = settings.engine_id.clone()?;

        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Some(GoogleSearchClient {
            client,
            api_key,
            engine_id,
            date_restrict: settings.date_restrict.clone(),
        })
    }

    /// One GET per query, freshest results first. A response without an
    /// `items` array is a valid empty result.
    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&SearchQuery {
                key: &self.api_key,
                cx: &self.engine_id,
                q: query,
                num: RESULTS_PER_QUERY,
                sort: "date",
                date_restrict: self.date_restrict.as_deref(),
            })
            .send()
            .await
            .context("Search request failed")?
            .error_for_status()
            .context("Search returned an error status")?;

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to deserialize search response")?;

        Ok(body.items)
    }
}

#[cfg(test)]
mod tests {
    use super::SearchResponse;

    #[test]
    fn response_items_deserialize() {
        let raw = r#"{
            "kind": "customsearch#search",
            "items": [
                {
                    "title": "Security Camera RFP",
                    "link": "https://foo.k12.ny.us/rfp",
                    "snippet": "New York schools"
                },
                {
                    "link": "https://example.com/bid"
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].title, "Security Camera RFP");
        // Missing fields default to empty strings instead of failing the run.
        assert_eq!(parsed.items[1].title, "");
        assert_eq!(parsed.items[1].link, "https://example.com/bid");
    }

    #[test]
    fn missing_items_array_is_an_empty_result() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"kind": "x"}"#).unwrap();
        assert!(parsed.items.is_empty());
    }
}

//! REST document store client
//!
//! Speaks a small JSON protocol: queries are POSTed to the collection's
//! query endpoint, counts to its count endpoint. Transport concerns (auth
//! header, rate limiting, error classification) live in the http module;
//! this client only shapes requests and responses.

use super::types::Record;
use super::{CountEstimator, DocumentStore};
use crate::error::Result;
use crate::filter::Filter;
use crate::http::StoreHttpClient;
use crate::query::Query;
use async_trait::async_trait;
use serde::Deserialize;

/// Remote store reached over HTTP
#[derive(Debug)]
pub struct RestStore {
    http: StoreHttpClient,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct HealthResponse {
    status: String,
}

impl RestStore {
    /// Create a store client over the given transport
    pub fn new(http: StoreHttpClient) -> Self {
        Self { http }
    }

    /// Check that the store answers at all
    pub async fn health(&self) -> Result<()> {
        let _: HealthResponse = self.http.get_json("/health").await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn execute(&self, query: &Query) -> Result<Vec<Record>> {
        let path = format!("/collections/{}/query", query.collection);
        let response: QueryResponse = self.http.post_json(&path, query).await?;
        Ok(response.records)
    }
}

#[async_trait]
impl CountEstimator for RestStore {
    async fn estimate(&self, collection: &str, filter: &Filter) -> Result<Option<u64>> {
        let path = format!("/collections/{collection}/count");
        let response: CountResponse = self.http.post_json(&path, filter).await?;
        Ok(response.count)
    }
}

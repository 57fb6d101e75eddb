// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Direct HTTP queries against applications on arbitrary chains.
//!
//! Used to read a counterpart chain without building a chain handle:
//! `POST {faucet_url}/chains/{chain_id}/applications/{app_id}` with a
//! `{"query": ...}` body.

use crate::config::parse_http_url;
use crate::errors::ConfigError;
use crate::query::error::{QueryError, QueryResult};
use crate::types::{ApplicationId, ChainId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl QueryResponse {
    fn into_result(self) -> QueryResult<Value> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(QueryError::GraphQl(first.message));
        }
        self.data.ok_or(QueryError::EmptyResponse)
    }
}

#[derive(Debug, Clone)]
pub struct CrossChainClient {
    base_url: Url,
    http: reqwest::Client,
}

impl CrossChainClient {
    pub fn new(faucet_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_http_url("faucet_url", faucet_url)?,
            http: reqwest::Client::new(),
        })
    }

    /// Query URL for one application. Ids are percent-encoded as single path segments.
    pub fn endpoint(&self, chain_id: &ChainId, app_id: &ApplicationId) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path, so this never fails.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "chains",
                chain_id.as_str(),
                "applications",
                app_id.as_str(),
            ]);
        }
        url
    }

    /// Runs a GraphQL query and returns its `data` member.
    pub async fn query(
        &self,
        chain_id: &ChainId,
        app_id: &ApplicationId,
        query: &str,
    ) -> QueryResult<Value> {
        let response = self
            .http
            .post(self.endpoint(chain_id, app_id))
            .json(&QueryRequest { query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<QueryResponse>().await?.into_result()
    }
}

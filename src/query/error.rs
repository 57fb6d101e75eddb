// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors from the cross-chain HTTP query endpoint.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Transport failure or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("Endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// GraphQL-level failure; carries the first error message verbatim.
    #[error("{0}")]
    GraphQl(String),

    /// Response had neither `data` nor `errors`.
    #[error("Response carried neither data nor errors")]
    EmptyResponse,
}

pub type QueryResult<T> = Result<T, QueryError>;

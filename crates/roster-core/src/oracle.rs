//! Similarity Oracle Client.
//!
//! The oracle is a remote scorer that decides whether a candidate name is a
//! near-duplicate of one already on the list. Calls are a single
//! timeout-bounded attempt; there is no retry.
//!
//! Wire contract:
//!
//! ```text
//! POST <base>/process-message
//!   { "task": "check_duplicate",
//!     "data": { "new_name": "...", "existing_names": ["..."] } }
//!
//! 200
//!   { "task": "check_duplicate",
//!     "result": { "is_duplicate": true, "matched_name": "...", "similarity_score": 0.91 } }
//! ```
//!
//! Missing result fields default to their zero value. A body that is not JSON
//! or has no `result` object is a protocol error.

use crate::error::{Result, RosterError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateVerdict {
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub matched_name: String,
    #[serde(default)]
    pub similarity_score: f64,
}

impl DuplicateVerdict {
    pub fn unique() -> Self {
        Self::default()
    }

    pub fn duplicate_of(matched: impl Into<String>, score: f64) -> Self {
        Self {
            is_duplicate: true,
            matched_name: matched.into(),
            similarity_score: score,
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckRequest<'a> {
    task: &'static str,
    data: CheckData<'a>,
}

#[derive(Debug, Serialize)]
struct CheckData<'a> {
    new_name: &'a str,
    existing_names: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    result: DuplicateVerdict,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

pub trait SimilarityOracle: Send + Sync {
    /// Ask whether `candidate` duplicates any of `existing`.
    fn check_duplicate(&self, candidate: &str, existing: &[String]) -> Result<DuplicateVerdict>;

    /// Liveness probe. Any non-success answer is an error.
    fn health(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a check response body.
///
/// The typed shape is tried first. If a field is mistyped the body is
/// re-read as a free-form map and each field is extracted by key, falling
/// back to its zero value.
pub fn decode_verdict(body: &[u8]) -> Result<DuplicateVerdict> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| RosterError::OracleProtocolError(format!("response is not JSON: {e}")))?;
    let Some(result) = value.get("result").filter(|r| r.is_object()) else {
        return Err(RosterError::OracleProtocolError(
            "response has no result object".to_string(),
        ));
    };

    if let Ok(typed) = serde_json::from_value::<CheckResponse>(value.clone()) {
        return Ok(typed.result);
    }

    Ok(DuplicateVerdict {
        is_duplicate: result["is_duplicate"].as_bool().unwrap_or(false),
        matched_name: result["matched_name"].as_str().unwrap_or("").to_string(),
        similarity_score: result["similarity_score"].as_f64().unwrap_or(0.0),
    })
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

pub struct HttpOracle {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpOracle {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RosterError::Config(format!("cannot build oracle client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

fn unreachable(e: reqwest::Error) -> RosterError {
    RosterError::OracleUnreachable(e.to_string())
}

impl SimilarityOracle for HttpOracle {
    fn check_duplicate(&self, candidate: &str, existing: &[String]) -> Result<DuplicateVerdict> {
        let url = paths::oracle_process_url(&self.base_url);
        let request = CheckRequest {
            task: "check_duplicate",
            data: CheckData {
                new_name: candidate,
                existing_names: existing,
            },
        };

        tracing::debug!(%url, candidate, existing = existing.len(), "oracle duplicate check");
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(unreachable)?;

        let status = resp.status();
        let body = resp.bytes().map_err(unreachable)?;
        if !status.is_success() {
            return Err(RosterError::OracleProtocolError(format!(
                "oracle returned {status}: {}",
                String::from_utf8_lossy(&body)
            )));
        }

        let verdict = decode_verdict(&body)?;
        tracing::debug!(
            candidate,
            is_duplicate = verdict.is_duplicate,
            matched = %verdict.matched_name,
            score = verdict.similarity_score,
            "oracle verdict"
        );
        Ok(verdict)
    }

    fn health(&self) -> Result<()> {
        let resp = self.client.get(&self.base_url).send().map_err(unreachable)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RosterError::OracleProtocolError(format!(
                "oracle returned non-success status: {status}"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

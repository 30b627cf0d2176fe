use crate::error::ExporterError;
use serde::{Deserialize, Deserializer, Serialize};

/// The response code the orchestrator reports when its health API answered normally.
pub const CODE_OK: &str = "OK";

/// Response body of the orchestrator's `/api/health/` endpoint.
///
/// Missing and `null` fields decode to their zero value and unknown fields are ignored, so older
/// and newer orchestrator versions decode alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HealthStatus {
    #[serde(alias = "code", deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(alias = "message", deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(alias = "details", deserialize_with = "null_as_default")]
    pub details: HealthDetails,
}

/// Node details attached to a health response.
///
/// Only `healthy` drives the exported gauge, the rest is carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HealthDetails {
    #[serde(alias = "healthy", deserialize_with = "null_as_default")]
    pub healthy: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active_node: bool,
    pub active_node: serde_json::Value,
    /// Whatever the node reports as its last error; the orchestrator may send a string, an
    /// object or `null`.
    #[serde(alias = "Err")]
    pub error: serde_json::Value,
    pub available_nodes: serde_json::Value,
    #[serde(deserialize_with = "null_as_default")]
    pub raft_leader: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_raft_leader: bool,
    #[serde(rename = "RaftLeaderURI", deserialize_with = "null_as_default")]
    pub raft_leader_uri: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raft_advertise: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raft_healthy_members: Vec<String>,
}

/// Go encodes nil slices, maps and pointers as `null`; treat those like absent fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HealthStatus {
    /// Decodes a raw health response body.
    ///
    /// # Errors
    /// Returns [`ExporterError::Decode`] when the body is not a JSON health document.
    pub fn from_slice(body: &[u8]) -> Result<Self, ExporterError> {
        serde_json::from_slice(body).map_err(ExporterError::from)
    }

    /// Whether the orchestrator answered with a normal `OK` code.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }

    /// The gauge value this response publishes, if any.
    ///
    /// `None` for non-`OK` codes: an API error says nothing about the cluster, so the last
    /// published value is kept.
    #[must_use]
    pub fn gauge_value(&self) -> Option<f64> {
        self.is_ok().then(|| if self.details.healthy { 1.0 } else { 0.0 })
    }
}

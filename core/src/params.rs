//! Parameter structs for the `users/*` operations.
//!
//! # Design
//! Parameters derive `Serialize` and are encoded with `serde_urlencoded`.
//! Unset fields are `None` and never reach the wire, while `Some(false)`
//! and `Some(0)` are sent as given. List parameters are comma-joined and
//! omitted when empty. Wire order follows field order.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::TransportError;

/// Parameters for `users/show`. Set `user_id` or `screen_name`; when both
/// are sent the service applies its own precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserShowParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    /// Whether the embedded `status` carries entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_entities: Option<bool>,
}

/// Parameters for `users/lookup`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserLookupParams {
    #[serde(serialize_with = "comma_separated", skip_serializing_if = "Vec::is_empty")]
    pub user_id: Vec<u64>,
    #[serde(serialize_with = "comma_separated", skip_serializing_if = "Vec::is_empty")]
    pub screen_name: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_entities: Option<bool>,
}

/// Parameters for `users/search`. `query` is always replaced by the query
/// passed to the search operation itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSearchParams {
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_entities: Option<bool>,
}

fn comma_separated<T, S>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    T: ToString,
    S: Serializer,
{
    let joined = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

/// Encode a parameter struct into ordered query pairs.
pub fn encode_query<P: Serialize>(params: &P) -> Result<Vec<(String, String)>, TransportError> {
    let encoded =
        serde_urlencoded::to_string(params).map_err(|e| TransportError::Encode(e.to_string()))?;
    serde_urlencoded::from_str(&encoded).map_err(|e| TransportError::Encode(e.to_string()))
}

//! Application metadata embedded between the bundle and the trailer

use serde::{Deserialize, Serialize};
use url::Url;

/// Metadata record describing the packaged application
///
/// Serialized as UTF-8 JSON. `author` and `name` are omitted when absent
/// and accepted as either missing or `null` when parsing, so images written
/// by older packagers stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Root module URL the runtime boots from
    pub entrypoint: Url,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Metadata {
    pub fn new(entrypoint: Url, author: Option<String>, name: Option<String>) -> Self {
        Metadata {
            entrypoint,
            author,
            name,
        }
    }
}

//! The version record returned by content reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable stored revision of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Storage row id; also the insertion order across the whole store.
    pub id: i64,
    /// The path the document was stored under.
    pub path: String,
    /// The document itself, as compact JSON text.
    pub text: String,
    /// When this version was written.
    pub added: DateTime<Utc>,
}

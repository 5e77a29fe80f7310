use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable unique identifier for a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Field stamped into every document's data with its identifier.
pub const ID_FIELD: &str = "_id";
/// Creation timestamp stamped at insert when the payload carries none.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Last-write timestamp, maintained by the store on update.
pub const UPDATED_AT_FIELD: &str = "updatedAt";
/// Internal revision counter, hidden by the default projection.
pub const REVISION_FIELD: &str = "_rev";

use bson::Bson;
use serde::{Deserialize, Serialize};

// Safety limits to prevent resource abuse
pub(crate) const MAX_PATH_DEPTH: usize = 32;
pub(crate) const MAX_SORT_FIELDS: usize = 8;
pub(crate) const MAX_PROJECTION_FIELDS: usize = 64;
pub(crate) const MAX_LIMIT: u64 = 10_000;

/// Defaults applied when pagination parameters are absent or invalid.
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CmpOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    True,
    And(Vec<Filter>),
    Not(Box<Filter>),
    Cmp { path: String, op: CmpOp, value: Bson },
}

impl Filter {
    /// Whether any comparison in the tree names `path`.
    #[must_use]
    pub fn mentions(&self, path: &str) -> bool {
        match self {
            Self::True => false,
            Self::And(fs) => fs.iter().any(|f| f.mentions(path)),
            Self::Not(f) => f.mentions(path),
            Self::Cmp { path: p, .. } => p == path,
        }
    }
}

/// Field selection for a request: an explicit allow-list, or the default
/// view that only hides the internal revision field. The two are mutually
/// exclusive per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Default,
    Include(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit) as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

/// The parsed, request-scoped combination of filter, sort, projection and
/// pagination. Built once per request and passed through the pipeline
/// stages unchanged; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub filter: Filter,
    pub sort: Vec<SortSpec>,
    pub projection: Projection,
    pub page: Page,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            filter: Filter::True,
            sort: Vec::new(),
            projection: Projection::Default,
            page: Page::default(),
        }
    }
}

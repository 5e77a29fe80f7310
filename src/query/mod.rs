// Submodules for separation of concerns
mod eval;
mod exec;
mod params;
mod types;

// Public API re-exports
pub use eval::{apply_projection, compare_bson, compare_docs, eval_filter, strip_internal};
pub use exec::{count_docs, find_docs};
pub use types::{
    CmpOp, DEFAULT_LIMIT, DEFAULT_PAGE, Filter, Order, Page, Projection, QuerySpec, SortSpec,
};

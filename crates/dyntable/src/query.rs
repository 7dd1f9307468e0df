//! Filter, sort and pagination planning shared by the managed store and
//! external data sources.

mod filter;
pub use filter::{FilterItem, Operator};

mod options;
pub use options::{RecordQueryOptions, DEFAULT_LIMIT, MAX_LIMIT};

mod planner;
pub(crate) use planner::{Layout, Planner};

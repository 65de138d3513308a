//! Pure transformations applied to fetched records.
//!
//! Store records flow through `normalize` -> `dedup` -> `filter` -> `order`;
//! `site` is shared by the filter stage, the analytics grouping and the
//! exports. `matcher` is the independent school-matching pipeline.

pub mod analytics;
pub mod dates;
pub mod dedup;
pub mod filter;
pub mod matcher;
pub mod normalize;
pub mod order;
pub mod remarks;
pub mod site;

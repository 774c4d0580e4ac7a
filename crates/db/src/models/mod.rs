//! Row structs and DTOs.
//!
//! Build list and item rows are converted into the `buildmaster-core`
//! entities at the repository boundary; identity rows are used as-is.

pub mod build_list;
pub mod item;
pub mod session;
pub mod user;

//! Pure domain logic for BuildMaster build lists.
//!
//! Nothing in this crate performs I/O. The persistence layer (`buildmaster-db`)
//! and the HTTP layer (`buildmaster-api`) both build on these types.

pub mod aggregate;
pub mod build_list;
pub mod error;
pub mod item;
pub mod ledger;
pub mod migration;
pub mod types;
pub mod validation;
pub mod view;

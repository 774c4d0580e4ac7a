//! Axum handlers, one module per resource.

pub mod auth;
pub mod build_list;
pub mod item;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` (or an executor / open transaction) as the first
//! argument. Build list and item queries are always scoped by owner.

pub mod build_list_repo;
pub mod item_repo;
pub mod session_repo;
pub mod user_repo;

pub use build_list_repo::BuildListRepo;
pub use item_repo::ItemRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;

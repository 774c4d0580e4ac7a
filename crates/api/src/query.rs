//! Query parameter types for API handlers.

use buildmaster_core::view::{SortConfig, SortDirection, SortField, StatusFilter, ViewQuery};
use serde::Deserialize;

/// Item list view parameters (`?status=&search=&sort=&direction=&toggle=`).
///
/// Omitted parameters fall back to all statuses, no search, name ascending.
/// `toggle` is a column-header click applied on top of `sort`/`direction`.
#[derive(Debug, Default, Deserialize)]
pub struct ItemViewParams {
    pub status: Option<StatusFilter>,
    pub search: Option<String>,
    pub sort: Option<SortField>,
    pub direction: Option<SortDirection>,
    pub toggle: Option<SortField>,
}

impl From<ItemViewParams> for ViewQuery {
    fn from(params: ItemViewParams) -> Self {
        let current = SortConfig {
            field: params.sort.unwrap_or_default(),
            direction: params.direction.unwrap_or_default(),
        };
        ViewQuery {
            filter: params.status.unwrap_or_default(),
            search: params.search.unwrap_or_default(),
            sort: match params.toggle {
                Some(field) => current.toggled(field),
                None => current,
            },
        }
    }
}

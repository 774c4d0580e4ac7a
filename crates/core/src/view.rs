//! Status filter, name search and ordering over derived items.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::item::DerivedItem;
use crate::ledger::ItemStatus;

/// Status filter; `All` keeps every item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    PartiallyPaid,
    Paid,
}

impl StatusFilter {
    fn matches(self, status: ItemStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == ItemStatus::Pending,
            Self::PartiallyPaid => status == ItemStatus::PartiallyPaid,
            Self::Paid => status == ItemStatus::Paid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    TotalPrice,
    PaidAmount,
    Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Selecting the active field flips its direction; any other field
    /// starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        let direction = if self.field == field && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { field, direction }
    }

    fn compare(self, a: &DerivedItem, b: &DerivedItem) -> Ordering {
        let ordering = match self.field {
            SortField::Name => compare_names(&a.item.name, &b.item.name),
            SortField::TotalPrice => a.item.total_price.cmp(&b.item.total_price),
            SortField::PaidAmount => a.paid_amount.cmp(&b.paid_amount),
            SortField::Status => a.status.cmp(&b.status),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Case-insensitive first, exact comparison as the tie-breaker.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Everything the list detail view needs to pick and order items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filter: StatusFilter,
    pub search: String,
    pub sort: SortConfig,
}

/// Filter, search and sort `items`.
///
/// The sort is stable: items with equal keys keep their input order in
/// both directions.
pub fn view(items: Vec<DerivedItem>, query: &ViewQuery) -> Vec<DerivedItem> {
    let needle = query.search.trim().to_lowercase();
    let mut selected: Vec<DerivedItem> = items
        .into_iter()
        .filter(|item| query.filter.matches(item.status))
        .filter(|item| needle.is_empty() || item.item.name.to_lowercase().contains(&needle))
        .collect();
    selected.sort_by(|a, b| query.sort.compare(a, b));
    selected
}

//! Budget metrics for a build list.
//!
//! Spend totals respect each item's `include_in_spend_calculation` flag;
//! `total_paid` and the progress figures cover every item.
//!
//! Sums saturate and percentages cap at `Decimal::MAX`, so rows written
//! before amounts were bounded still produce metrics.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::build_list::Budget;
use crate::item::{derive, StoredItem};
use crate::ledger::ItemStatus;
use crate::types::Money;

/// Decimal places kept on percentage figures.
pub const PERCENT_DECIMAL_PLACES: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Number of items in each payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub partially_paid: usize,
    pub paid: usize,
}

/// Aggregated spend figures for one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListMetrics {
    /// Paid so far across all items, included or not.
    pub total_paid: Money,
    /// Outstanding balance of included items.
    pub total_remaining_included: Money,
    /// Sum of included item prices.
    pub total_projected_cost: Money,
    /// `total_projected_cost / total_budget * 100`; unclamped, so it can exceed 100.
    pub budget_usage_percent: Decimal,
    /// `budget_usage_percent` clamped to `[0, 100]` for progress bars.
    pub display_usage_percent: Decimal,
    /// `total_budget - total_projected_cost`; negative when over budget.
    pub difference_from_budget: Money,
    pub over_budget: bool,
    /// Sum of all item prices, included or not.
    pub total_cost_all: Money,
    /// `total_paid / total_cost_all * 100`, or 0 for a list with no cost.
    pub overall_progress_percent: Decimal,
    pub status_counts: StatusCounts,
    pub item_count: usize,
}

/// Compute the metrics for a list's items against its budget.
pub fn aggregate(budget: &Budget, items: &[StoredItem]) -> ListMetrics {
    let mut total_paid = Decimal::ZERO;
    let mut total_remaining_included = Decimal::ZERO;
    let mut total_projected_cost = Decimal::ZERO;
    let mut total_cost_all = Decimal::ZERO;
    let mut status_counts = StatusCounts::default();

    for item in items {
        let derived = derive(item);
        total_paid = total_paid.saturating_add(derived.paid_amount);
        total_cost_all = total_cost_all.saturating_add(item.total_price);
        if item.include_in_spend_calculation {
            total_projected_cost = total_projected_cost.saturating_add(item.total_price);
            total_remaining_included =
                total_remaining_included.saturating_add(derived.remaining_balance);
        }
        match derived.status {
            ItemStatus::Pending => status_counts.pending += 1,
            ItemStatus::PartiallyPaid => status_counts.partially_paid += 1,
            ItemStatus::Paid => status_counts.paid += 1,
        }
    }

    let budget_usage_percent = percent_of(total_projected_cost, budget.total_budget);
    let difference_from_budget = budget.total_budget.saturating_sub(total_projected_cost);

    ListMetrics {
        total_paid,
        total_remaining_included,
        total_projected_cost,
        budget_usage_percent,
        display_usage_percent: budget_usage_percent.clamp(Decimal::ZERO, HUNDRED),
        difference_from_budget,
        over_budget: difference_from_budget < Decimal::ZERO,
        total_cost_all,
        overall_progress_percent: percent_of(total_paid, total_cost_all),
        status_counts,
        item_count: items.len(),
    }
}

/// `part / whole * 100` rounded to [`PERCENT_DECIMAL_PLACES`], or 0 when
/// `whole` is not positive.
fn percent_of(part: Money, whole: Money) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(Decimal::MAX)
        .round_dp(PERCENT_DECIMAL_PLACES)
}

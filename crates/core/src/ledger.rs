//! Installment ledger arithmetic.
//!
//! An item's payment plan is a vector of installment amounts, one slot per
//! planned payment. A slot holding a positive amount counts as logged; any
//! other value is an unfilled slot. Everything the UI shows about an item's
//! payment progress is derived from that vector and the item's total price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Minimum number of planned installments for an item.
pub const MIN_PAYMENT_COUNT: i32 = 1;

/// Maximum number of planned installments for an item.
pub const MAX_PAYMENT_COUNT: i32 = 120;

/// Decimal places used when suggesting a payment amount.
pub const SUGGESTION_DECIMAL_PLACES: u32 = 2;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Payment completeness of a single item.
///
/// Variant order is the sort ordinal: `Pending < PartiallyPaid < Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    PartiallyPaid,
    Paid,
}

impl ItemStatus {
    /// Classify an item from its price and the amount paid so far.
    ///
    /// A zero-price item is `Pending`, whatever has been paid against it.
    pub fn from_amounts(total_price: Money, paid_amount: Money) -> Self {
        if total_price > Decimal::ZERO && paid_amount >= total_price {
            Self::Paid
        } else if paid_amount > Decimal::ZERO && paid_amount < total_price {
            Self::PartiallyPaid
        } else {
            Self::Pending
        }
    }

    /// Human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::PartiallyPaid => "Partially Paid",
            Self::Paid => "Paid",
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Values derived from an item's payment vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub paid_amount: Money,
    pub payments_made: usize,
    pub remaining_balance: Money,
    pub status: ItemStatus,
}

/// Sum of the positive entries in `payments`, saturating at `Decimal::MAX`.
pub fn paid_amount(payments: &[Money]) -> Money {
    payments
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add((*p).max(Decimal::ZERO)))
}

/// Derive paid amount, payment count, remaining balance and status.
pub fn summarize(total_price: Money, payments: &[Money]) -> LedgerSummary {
    let paid = paid_amount(payments);
    LedgerSummary {
        paid_amount: paid,
        payments_made: payments.iter().filter(|p| **p > Decimal::ZERO).count(),
        remaining_balance: total_price.saturating_sub(paid).max(Decimal::ZERO),
        status: ItemStatus::from_amounts(total_price, paid),
    }
}

// ---------------------------------------------------------------------------
// Slot management
// ---------------------------------------------------------------------------

/// Resize a payment vector to `count` slots.
///
/// Existing values are kept by index; missing slots are zero-filled and extra
/// slots are dropped. Counts are clamped to
/// [`MIN_PAYMENT_COUNT`]..=[`MAX_PAYMENT_COUNT`].
pub fn resize_payments(payments: &[Money], count: i32) -> Vec<Money> {
    let len = clamp_payment_count(count) as usize;
    let mut resized: Vec<Money> = payments.iter().take(len).copied().collect();
    resized.resize(len, Decimal::ZERO);
    resized
}

/// Clamp a planned installment count into the supported range.
pub fn clamp_payment_count(count: i32) -> i32 {
    count.clamp(MIN_PAYMENT_COUNT, MAX_PAYMENT_COUNT)
}

/// Write `amount` into the first unfilled slot of `payments`.
///
/// If the new total exceeds `total_price`, the slot just written is reduced
/// by the excess (floored at zero) so the ledger never reports more paid than
/// the price. Returns the index written, or `None` when every slot already
/// holds a positive amount, in which case `payments` is untouched.
pub fn fill_next_slot(payments: &mut [Money], total_price: Money, amount: Money) -> Option<usize> {
    let index = payments.iter().position(|p| *p <= Decimal::ZERO)?;
    payments[index] = amount;

    let total_paid = paid_amount(payments);
    if total_paid > total_price {
        let excess = total_paid.saturating_sub(total_price);
        payments[index] = amount.saturating_sub(excess).max(Decimal::ZERO);
    }
    Some(index)
}

/// Suggested amount for the next installment.
///
/// With unfilled slots left, this is an even share of the price capped at the
/// remaining balance; otherwise it is the remaining balance.
pub fn suggest_payment(total_price: Money, payments: &[Money], planned_count: i32) -> Money {
    let planned = clamp_payment_count(planned_count);
    let summary = summarize(total_price, payments);
    let remaining_slots = planned as i64 - summary.payments_made as i64;

    let suggestion = if remaining_slots > 0 && total_price > Decimal::ZERO {
        let share = total_price / Decimal::from(planned);
        summary.remaining_balance.min(share)
    } else {
        summary.remaining_balance
    };
    suggestion
        .max(Decimal::ZERO)
        .round_dp(SUGGESTION_DECIMAL_PLACES)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

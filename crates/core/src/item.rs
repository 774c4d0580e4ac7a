//! Build list items: stored shape, derived view, and the mutations applied to
//! them (create, edit, log a payment).
//!
//! All mutations are pure: they take the current [`StoredItem`] and return
//! the next one. The persistence layer wraps them in a read-modify-write so
//! concurrent writers cannot interleave.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::ledger::{self, ItemStatus, LedgerSummary, MAX_PAYMENT_COUNT, MIN_PAYMENT_COUNT};
use crate::types::{DbId, Money, Timestamp};
use crate::validation::{
    non_negative_amount, non_negative_amounts, not_blank, validate_input,
    validate_payment_amount,
};

/// Maximum item name length, in characters.
pub const MAX_ITEM_NAME_LEN: u64 = 100;
/// Maximum notes length, in characters.
pub const MAX_NOTES_LEN: u64 = 500;

// ---------------------------------------------------------------------------
// Stored and derived shapes
// ---------------------------------------------------------------------------

/// An item as persisted in a build list's item collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: DbId,
    pub list_id: DbId,
    pub name: String,
    pub total_price: Money,
    pub planned_payment_count: i32,
    pub logged_payments: Vec<Money>,
    pub notes: Option<String>,
    pub include_in_spend_calculation: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An item together with its derived payment figures. Never persisted.
///
/// `item.logged_payments` is normalized to `planned_payment_count` slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedItem {
    #[serde(flatten)]
    pub item: StoredItem,
    pub paid_amount: Money,
    pub payments_made: usize,
    pub remaining_balance: Money,
    pub status: ItemStatus,
}

/// Derive the display view of an item.
///
/// Total over all inputs: a payment vector whose length disagrees with the
/// planned count is padded or truncated first, and negative entries count
/// as zero.
pub fn derive(item: &StoredItem) -> DerivedItem {
    let slots = item.payment_slots();
    let LedgerSummary {
        paid_amount,
        payments_made,
        remaining_balance,
        status,
    } = ledger::summarize(item.total_price, &slots);

    DerivedItem {
        item: StoredItem {
            logged_payments: slots,
            ..item.clone()
        },
        paid_amount,
        payments_made,
        remaining_balance,
        status,
    }
}

impl StoredItem {
    /// The payment vector resized to the planned installment count.
    pub fn payment_slots(&self) -> Vec<Money> {
        ledger::resize_payments(&self.logged_payments, self.planned_payment_count)
    }

    /// Log `amount` into the next unfilled installment slot.
    ///
    /// Fails with [`CoreError::NoAvailableSlot`] when every planned installment
    /// already holds a payment. Overpayment is clamped on the written slot.
    pub fn log_payment(&self, amount: Money) -> Result<StoredItem, CoreError> {
        validate_payment_amount(amount)?;

        let mut slots = self.payment_slots();
        ledger::fill_next_slot(&mut slots, self.total_price, amount)
            .ok_or(CoreError::NoAvailableSlot { item_id: self.id })?;

        Ok(StoredItem {
            logged_payments: slots,
            ..self.clone()
        })
    }

    /// Merge an edit-form submission into this item.
    ///
    /// Changing the planned count resizes the payment vector; submitted
    /// payments replace the stored ones. The merged item is re-validated.
    pub fn apply_update(&self, input: &UpdateItem) -> Result<StoredItem, CoreError> {
        let input = UpdateItem {
            name: input.name.as_ref().map(|n| n.trim().to_string()),
            notes: input.notes.as_ref().map(|n| n.trim().to_string()),
            ..input.clone()
        };
        validate_input(&input)?;

        let mut next = self.clone();
        if let Some(name) = &input.name {
            next.name = name.clone();
        }
        if let Some(price) = input.total_price {
            next.total_price = price;
        }
        if let Some(count) = input.planned_payment_count {
            next.planned_payment_count = count;
        }
        if let Some(notes) = &input.notes {
            next.notes = normalize_notes(Some(notes.clone()));
        }
        if let Some(include) = input.include_in_spend_calculation {
            next.include_in_spend_calculation = include;
        }
        let base = input
            .logged_payments
            .as_deref()
            .unwrap_or(&self.logged_payments);
        next.logged_payments = ledger::resize_payments(base, next.planned_payment_count);

        check_paid_within_price(next.total_price, &next.logged_payments)?;
        Ok(next)
    }

    /// Suggested amount for the next installment.
    pub fn suggested_payment(&self) -> Money {
        ledger::suggest_payment(
            self.total_price,
            &self.payment_slots(),
            self.planned_payment_count,
        )
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

fn default_payment_count() -> i32 {
    MIN_PAYMENT_COUNT
}

fn default_include() -> bool {
    true
}

/// DTO for adding an item to a build list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, max = MAX_ITEM_NAME_LEN), custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub total_price: Money,
    #[serde(default = "default_payment_count")]
    #[validate(range(min = MIN_PAYMENT_COUNT, max = MAX_PAYMENT_COUNT))]
    pub planned_payment_count: i32,
    #[serde(default)]
    #[validate(custom(function = "non_negative_amounts"))]
    pub logged_payments: Vec<Money>,
    #[validate(length(max = MAX_NOTES_LEN))]
    pub notes: Option<String>,
    #[serde(default = "default_include")]
    pub include_in_spend_calculation: bool,
}

impl CreateItem {
    /// Trim text fields, validate, and size the payment vector to the plan.
    pub fn validated(self) -> Result<CreateItem, CoreError> {
        let input = CreateItem {
            name: self.name.trim().to_string(),
            notes: normalize_notes(self.notes),
            ..self
        };
        validate_input(&input)?;

        let logged_payments =
            ledger::resize_payments(&input.logged_payments, input.planned_payment_count);
        check_paid_within_price(input.total_price, &logged_payments)?;

        Ok(CreateItem {
            logged_payments,
            ..input
        })
    }
}

/// DTO for editing an item. All fields are optional.
///
/// An empty `notes` string clears the notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = MAX_ITEM_NAME_LEN), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "non_negative_amount"))]
    pub total_price: Option<Money>,
    #[validate(range(min = MIN_PAYMENT_COUNT, max = MAX_PAYMENT_COUNT))]
    pub planned_payment_count: Option<i32>,
    #[validate(custom(function = "non_negative_amounts"))]
    pub logged_payments: Option<Vec<Money>>,
    #[validate(length(max = MAX_NOTES_LEN))]
    pub notes: Option<String>,
    pub include_in_spend_calculation: Option<bool>,
}

/// Request body for logging a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct LogPayment {
    pub amount: Money,
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

fn check_paid_within_price(total_price: Money, payments: &[Money]) -> Result<(), CoreError> {
    let paid = ledger::paid_amount(payments);
    if paid > total_price {
        return Err(CoreError::Validation(format!(
            "logged_payments: paid amount {paid} cannot exceed total price {total_price}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

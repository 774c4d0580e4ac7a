//! Build list entity, budget, and the DTOs used to create and edit lists.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Money, Timestamp};
use crate::validation::{non_negative_amount, not_blank, validate_input};

/// Total budget assigned to a newly created list.
pub const DEFAULT_TOTAL_BUDGET: i64 = 1500;
/// Currency symbol assigned to a newly created list.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
/// Maximum list name length, in characters.
pub const MAX_LIST_NAME_LEN: u64 = 100;
/// Maximum currency symbol length, in characters.
pub const MAX_CURRENCY_SYMBOL_LEN: u64 = 3;

/// Spending budget shared by every item of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub total_budget: Money,
    pub currency_symbol: String,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            total_budget: Decimal::from(DEFAULT_TOTAL_BUDGET),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl Budget {
    /// Render an amount with this budget's currency symbol, e.g. `$19.99`.
    pub fn format(&self, amount: Money) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

/// A named collection of items with one owner and one budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildList {
    pub id: DbId,
    pub owner_user_id: DbId,
    pub name: String,
    pub budget: Budget,
    pub schema_version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a build list. An omitted budget gets [`Budget::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateBuildList {
    #[validate(length(min = 1, max = MAX_LIST_NAME_LEN), custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub total_budget: Option<Money>,
    #[validate(length(min = 1, max = MAX_CURRENCY_SYMBOL_LEN))]
    pub currency_symbol: Option<String>,
}

impl CreateBuildList {
    /// Trim the name and validate.
    pub fn validated(self) -> Result<CreateBuildList, CoreError> {
        let input = CreateBuildList {
            name: self.name.trim().to_string(),
            currency_symbol: self.currency_symbol.map(|s| s.trim().to_string()),
            ..self
        };
        validate_input(&input)?;
        Ok(input)
    }

    /// The budget this list starts with.
    pub fn initial_budget(&self) -> Budget {
        let defaults = Budget::default();
        Budget {
            total_budget: self.total_budget.unwrap_or(defaults.total_budget),
            currency_symbol: self
                .currency_symbol
                .clone()
                .unwrap_or(defaults.currency_symbol),
        }
    }
}

/// DTO for renaming or re-budgeting a list. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateBuildList {
    #[validate(length(min = 1, max = MAX_LIST_NAME_LEN), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "non_negative_amount"))]
    pub total_budget: Option<Money>,
    #[validate(length(min = 1, max = MAX_CURRENCY_SYMBOL_LEN))]
    pub currency_symbol: Option<String>,
}

impl UpdateBuildList {
    /// Trim text fields and validate.
    pub fn validated(self) -> Result<UpdateBuildList, CoreError> {
        let input = UpdateBuildList {
            name: self.name.map(|n| n.trim().to_string()),
            currency_symbol: self.currency_symbol.map(|s| s.trim().to_string()),
            ..self
        };
        validate_input(&input)?;
        Ok(input)
    }
}

/// Request body of the budget editor. Both fields are required.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBudget {
    pub total_budget: Money,
    pub currency_symbol: String,
}

impl From<UpdateBudget> for UpdateBuildList {
    fn from(budget: UpdateBudget) -> Self {
        Self {
            name: None,
            total_budget: Some(budget.total_budget),
            currency_symbol: Some(budget.currency_symbol),
        }
    }
}

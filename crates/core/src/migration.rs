//! Versioned migration of exported local-storage build lists.
//!
//! Earlier clients kept every list in browser storage. Two item shapes exist
//! in those exports:
//!
//! | Version | Item payment fields                              |
//! |---------|--------------------------------------------------|
//! | 1       | `paidAmount` (single lump sum)                   |
//! | 2       | `numberOfPayments` + `individualPayments` array  |
//!
//! [`migrate_export`] runs once per import and turns an export into create
//! DTOs at [`CURRENT_SCHEMA_VERSION`].

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::build_list::{
    CreateBuildList, DEFAULT_CURRENCY_SYMBOL, MAX_CURRENCY_SYMBOL_LEN, MAX_LIST_NAME_LEN,
};
use crate::item::{CreateItem, MAX_ITEM_NAME_LEN, MAX_NOTES_LEN};
use crate::ledger::{clamp_payment_count, resize_payments, MAX_PAYMENT_COUNT, MIN_PAYMENT_COUNT};
use crate::types::Money;

/// Schema version stamped on lists created by this server.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Item schema version with a single `paidAmount`.
pub const LUMP_SUM_SCHEMA_VERSION: i32 = 1;

const UNTITLED_LIST: &str = "Untitled build";
const UNTITLED_ITEM: &str = "Untitled item";

// ---------------------------------------------------------------------------
// Export shapes
// ---------------------------------------------------------------------------

/// Top-level export document: `{ "lists": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyExport {
    #[serde(default)]
    pub lists: Vec<LegacyList>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyList {
    #[serde(default)]
    pub name: String,
    pub budget: Option<LegacyBudget>,
    #[serde(default)]
    pub items: Vec<LegacyItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBudget {
    #[serde(default)]
    pub total_budget: Money,
    #[serde(default)]
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_price: Money,
    pub notes: Option<String>,
    pub number_of_payments: Option<i32>,
    /// Unset slots may be serialized as `null`.
    pub individual_payments: Option<Vec<Option<Money>>>,
    pub paid_amount: Option<Money>,
    pub include_in_spend_calculation: Option<bool>,
}

impl LegacyItem {
    /// Schema version inferred from which payment fields are present.
    pub fn schema_version(&self) -> i32 {
        if self.individual_payments.is_some() {
            CURRENT_SCHEMA_VERSION
        } else {
            LUMP_SUM_SCHEMA_VERSION
        }
    }
}

/// One migrated list with its items, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedList {
    pub list: CreateBuildList,
    pub items: Vec<CreateItem>,
}

// ---------------------------------------------------------------------------
// Migration
// ---------------------------------------------------------------------------

/// Migrate every list of an export.
pub fn migrate_export(export: LegacyExport) -> Vec<MigratedList> {
    export.lists.into_iter().map(migrate_list).collect()
}

/// Migrate one list. A missing budget becomes `0` in the default currency.
pub fn migrate_list(list: LegacyList) -> MigratedList {
    let budget = list.budget.unwrap_or(LegacyBudget {
        total_budget: Decimal::ZERO,
        currency_symbol: String::new(),
    });
    let currency: String = budget.currency_symbol.trim()
        .chars()
        .take(MAX_CURRENCY_SYMBOL_LEN as usize)
        .collect();

    MigratedList {
        list: CreateBuildList {
            name: clean_name(&list.name, MAX_LIST_NAME_LEN, UNTITLED_LIST),
            total_budget: Some(budget.total_budget.max(Decimal::ZERO)),
            currency_symbol: Some(if currency.is_empty() {
                DEFAULT_CURRENCY_SYMBOL.to_string()
            } else {
                currency
            }),
        },
        items: list.items.into_iter().map(migrate_item).collect(),
    }
}

/// Migrate one item to the installment schema.
pub fn migrate_item(item: LegacyItem) -> CreateItem {
    let payments = match item.schema_version() {
        LUMP_SUM_SCHEMA_VERSION => lump_sum_payments(&item),
        _ => installment_payments(&item),
    };
    let planned = planned_count(&item);

    CreateItem {
        name: clean_name(&item.name, MAX_ITEM_NAME_LEN, UNTITLED_ITEM),
        total_price: item.total_price.max(Decimal::ZERO),
        planned_payment_count: planned,
        logged_payments: resize_payments(&payments, planned),
        notes: item
            .notes
            .map(|n| n.trim().chars().take(MAX_NOTES_LEN as usize).collect::<String>())
            .filter(|n| !n.is_empty()),
        include_in_spend_calculation: item.include_in_spend_calculation.unwrap_or(true),
    }
}

fn planned_count(item: &LegacyItem) -> i32 {
    let from_payments = item
        .individual_payments
        .as_ref()
        .map(|p| i32::try_from(p.len()).unwrap_or(MAX_PAYMENT_COUNT))
        .unwrap_or(MIN_PAYMENT_COUNT);
    clamp_payment_count(item.number_of_payments.unwrap_or(from_payments))
}

fn lump_sum_payments(item: &LegacyItem) -> Vec<Money> {
    vec![item.paid_amount.unwrap_or_default().max(Decimal::ZERO)]
}

fn installment_payments(item: &LegacyItem) -> Vec<Money> {
    item.individual_payments
        .iter()
        .flatten()
        .map(|p| p.unwrap_or_default().max(Decimal::ZERO))
        .collect()
}

fn clean_name(raw: &str, max_len: u64, fallback: &str) -> String {
    let trimmed: String = raw.trim().chars().take(max_len as usize).collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn m(value: i64) -> Money {
        Decimal::from(value)
    }

    fn parse(value: serde_json::Value) -> LegacyExport {
        serde_json::from_value(value).expect("export should deserialize")
    }

    #[test]
    fn lump_sum_item_becomes_single_slot() {
        let export = parse(json!({
            "lists": [{
                "name": "Old rig",
                "budget": { "totalBudget": 1200, "currencySymbol": "$" },
                "items": [{ "name": "GPU", "totalPrice": 500, "paidAmount": 200 }]
            }]
        }));
        let migrated = migrate_export(export);
        let item = &migrated[0].items[0];

        assert_eq!(item.planned_payment_count, 1);
        assert_eq!(item.logged_payments, vec![m(200)]);
        assert!(item.include_in_spend_calculation);
    }

    #[test]
    fn installment_item_keeps_slots_and_fills_nulls() {
        let export = parse(json!({
            "lists": [{
                "name": "New rig",
                "items": [{
                    "name": "CPU",
                    "totalPrice": 300,
                    "numberOfPayments": 3,
                    "individualPayments": [100, null],
                    "includeInSpendCalculation": false
                }]
            }]
        }));
        let item = &migrate_export(export)[0].items[0];

        assert_eq!(item.planned_payment_count, 3);
        assert_eq!(item.logged_payments, vec![m(100), m(0), m(0)]);
        assert!(!item.include_in_spend_calculation);
    }

    #[test]
    fn payment_count_inferred_from_array() {
        let item = migrate_item(LegacyItem {
            name: "RAM".into(),
            total_price: m(120),
            notes: None,
            number_of_payments: None,
            individual_payments: Some(vec![Some(m(40)), Some(m(40)), None]),
            paid_amount: None,
            include_in_spend_calculation: None,
        });
        assert_eq!(item.planned_payment_count, 3);
        assert_eq!(item.logged_payments, vec![m(40), m(40), m(0)]);
    }

    #[test]
    fn oversized_payment_plan_is_capped() {
        let export = parse(json!({
            "lists": [{
                "name": "Huge plan",
                "items": [{ "name": "Desk", "totalPrice": 240, "numberOfPayments": i32::MAX }]
            }]
        }));
        let item = migrate_export(export).remove(0).items.remove(0);

        assert_eq!(item.planned_payment_count, MAX_PAYMENT_COUNT);
        assert_eq!(item.logged_payments.len(), MAX_PAYMENT_COUNT as usize);
        item.validated().expect("capped item should validate");
    }

    #[test]
    fn schema_version_detection() {
        let mut item = LegacyItem {
            name: "PSU".into(),
            total_price: m(90),
            notes: None,
            number_of_payments: None,
            individual_payments: None,
            paid_amount: Some(m(10)),
            include_in_spend_calculation: None,
        };
        assert_eq!(item.schema_version(), LUMP_SUM_SCHEMA_VERSION);
        item.individual_payments = Some(vec![]);
        assert_eq!(item.schema_version(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn missing_budget_and_blank_names_get_defaults() {
        let export = parse(json!({ "lists": [{ "items": [{ "name": "  ", "totalPrice": 5 }] }] }));
        let migrated = &migrate_export(export)[0];

        assert_eq!(migrated.list.name, UNTITLED_LIST);
        assert_eq!(migrated.list.total_budget, Some(m(0)));
        assert_eq!(migrated.list.currency_symbol.as_deref(), Some("$"));
        assert_eq!(migrated.items[0].name, UNTITLED_ITEM);
    }

    #[test]
    fn migrated_items_pass_validation() {
        let export = parse(json!({
            "lists": [{
                "name": "x".repeat(150),
                "budget": { "totalBudget": 2000, "currencySymbol": "EURO" },
                "items": [{
                    "name": "y".repeat(150),
                    "totalPrice": 100,
                    "notes": "z".repeat(600),
                    "paidAmount": 30
                }]
            }]
        }));
        let migrated = migrate_export(export).remove(0);

        let list = migrated.list.validated().expect("list should validate");
        assert_eq!(list.name.chars().count(), MAX_LIST_NAME_LEN as usize);
        assert_eq!(list.currency_symbol.as_deref(), Some("EUR"));
        for item in migrated.items {
            item.validated().expect("item should validate");
        }
    }
}

//! Reference household budgets shown next to the live spreadsheet figures.
//!
//! Fixed constants; nothing here is derived from fetched data.

use rust_decimal::Decimal;

use crate::formatting::format_currency_with;

/// Spending in one budget category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpend {
    pub name: &'static str,
    pub amount: Decimal,
}

/// A household's monthly budget broken down by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdBudget {
    /// Display name of the country, e.g. `"US"`.
    pub region: &'static str,
    pub currency_symbol: &'static str,
    /// Stated total spent.
    pub total: Decimal,
    /// Categories in display order.
    pub categories: Vec<CategorySpend>,
}

impl HouseholdBudget {
    /// The category with the largest amount, first one on ties.
    pub fn largest_category(&self) -> Option<&CategorySpend> {
        self.categories
            .iter()
            .fold(None, |best: Option<&CategorySpend>, c| match best {
                Some(b) if b.amount >= c.amount => Some(b),
                _ => Some(c),
            })
    }

    /// Sum of every category amount.
    pub fn categories_total(&self) -> Decimal {
        self.categories.iter().map(|c| c.amount).sum()
    }

    /// `amount` formatted in this household's currency.
    pub fn format_amount(&self, amount: Decimal) -> String {
        format_currency_with(self.currency_symbol, amount)
    }
}

fn category(name: &'static str, cents: i64) -> CategorySpend {
    CategorySpend {
        name,
        amount: Decimal::new(cents, 2),
    }
}

/// US household spending.
pub fn us_household() -> HouseholdBudget {
    HouseholdBudget {
        region: "US",
        currency_symbol: "$",
        total: Decimal::new(420_050, 2),
        categories: vec![
            category("Transportation", 65_000),
            category("Rent", 210_000),
            category("Entertainment", 45_050),
            category("Utilities", 30_000),
            category("Groceries", 70_000),
        ],
    }
}

/// Italy household spending.
pub fn italy_household() -> HouseholdBudget {
    HouseholdBudget {
        region: "Italy",
        currency_symbol: "€",
        total: Decimal::new(380_075, 2),
        categories: vec![
            category("Transportation", 45_000),
            category("Rent", 180_075),
            category("Entertainment", 30_000),
            category("Utilities", 50_000),
            category("Groceries", 75_000),
        ],
    }
}

/// Both reference households in display order.
pub fn reference_households() -> Vec<HouseholdBudget> {
    vec![us_household(), italy_household()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_categories_sum_to_total() {
        let us = us_household();
        assert_eq!(us.categories_total(), us.total);
        assert_eq!(us.format_amount(us.total), "$4,200.50");
    }

    #[test]
    fn test_italy_categories_sum_to_total() {
        let it = italy_household();
        assert_eq!(it.categories_total(), it.total);
        assert_eq!(it.format_amount(it.total), "€3,800.75");
    }

    #[test]
    fn test_largest_category_is_rent() {
        for household in reference_households() {
            let largest = household.largest_category().unwrap();
            assert_eq!(largest.name, "Rent", "{}", household.region);
        }
        assert_eq!(
            us_household().largest_category().unwrap().amount,
            Decimal::new(2100, 0)
        );
    }

    #[test]
    fn test_largest_category_empty() {
        let empty = HouseholdBudget {
            region: "Nowhere",
            currency_symbol: "$",
            total: Decimal::ZERO,
            categories: vec![],
        };
        assert!(empty.largest_category().is_none());
        assert_eq!(empty.categories_total(), Decimal::ZERO);
    }

    #[test]
    fn test_category_order_preserved() {
        let names: Vec<&str> = us_household().categories.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["Transportation", "Rent", "Entertainment", "Utilities", "Groceries"]
        );
    }
}

//! Master data created on demand.
//!
//! Invoices and payments name customers, suppliers and items that may not
//! exist yet. Builders do not create them; they return a `MasterRecordPlan`
//! that the persistence layer applies in the same database transaction as
//! the document insert.

use serde::{Deserialize, Serialize};

/// Item group assigned when the caller does not name one.
pub const DEFAULT_ITEM_GROUP: &str = "All Item Groups";

/// Customer and supplier type assigned to auto-created parties.
pub const DEFAULT_PARTY_TYPE: &str = "Individual";

/// Posting defaults of a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDefaults {
    /// Company name.
    pub name: String,
    /// Functional currency code.
    pub default_currency: String,
    /// Default receivable (debtors) account.
    pub default_receivable_account: Option<String>,
    /// Default payable (creditors) account.
    pub default_payable_account: Option<String>,
    /// Default cash account.
    pub default_cash_account: Option<String>,
    /// Default cost center.
    pub default_cost_center: Option<String>,
}

impl CompanyDefaults {
    /// Company with no posting defaults configured.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_currency: "USD".to_string(),
            default_receivable_account: None,
            default_payable_account: None,
            default_cash_account: None,
            default_cost_center: None,
        }
    }
}

/// A customer to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    /// Customer name (also its identifier).
    pub customer_name: String,
    /// Customer type.
    pub customer_type: String,
}

/// A supplier to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    /// Supplier name (also its identifier).
    pub supplier_name: String,
    /// Supplier type.
    pub supplier_type: String,
}

/// An item to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Item code (also its identifier).
    pub item_code: String,
    /// Display name, defaults to the code.
    pub item_name: String,
    /// Item group.
    pub item_group: String,
    /// Whether stock is kept for the item.
    pub is_stock_item: bool,
    /// Whether the item can be sold.
    pub is_sales_item: bool,
    /// Whether the item can be purchased.
    pub is_purchase_item: bool,
}

/// Master records that must exist before a document can be inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterRecordPlan {
    /// Customers to create.
    pub customers: Vec<NewCustomer>,
    /// Suppliers to create.
    pub suppliers: Vec<NewSupplier>,
    /// Items to create.
    pub items: Vec<NewItem>,
}

impl MasterRecordPlan {
    /// Returns true if there is nothing to create.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() && self.suppliers.is_empty() && self.items.is_empty()
    }

    /// Plans a customer with the default type.
    pub fn add_customer(&mut self, name: &str) {
        if !self.customers.iter().any(|c| c.customer_name == name) {
            self.customers.push(NewCustomer {
                customer_name: name.to_string(),
                customer_type: DEFAULT_PARTY_TYPE.to_string(),
            });
        }
    }

    /// Plans a supplier with the default type.
    pub fn add_supplier(&mut self, name: &str) {
        if !self.suppliers.iter().any(|s| s.supplier_name == name) {
            self.suppliers.push(NewSupplier {
                supplier_name: name.to_string(),
                supplier_type: DEFAULT_PARTY_TYPE.to_string(),
            });
        }
    }

    /// Plans an item; the first mention of a code wins.
    pub fn add_item(&mut self, item_code: &str, item_name: Option<&str>, item_group: Option<&str>) {
        if self.items.iter().any(|i| i.item_code == item_code) {
            return;
        }
        self.items.push(NewItem {
            item_code: item_code.to_string(),
            item_name: item_name.unwrap_or(item_code).to_string(),
            item_group: item_group.unwrap_or(DEFAULT_ITEM_GROUP).to_string(),
            is_stock_item: true,
            is_sales_item: true,
            is_purchase_item: true,
        });
    }
}

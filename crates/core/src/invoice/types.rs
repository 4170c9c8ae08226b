//! Invoice domain types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::DocType;
use crate::fields::{FieldSpec, FieldType};
use crate::lookup::EntityKind;

/// Sales or purchase side of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceKind {
    /// Raised to a customer.
    Sales,
    /// Received from a supplier.
    Purchase,
}

impl InvoiceKind {
    /// Returns the document type.
    #[must_use]
    pub const fn doctype(&self) -> DocType {
        match self {
            Self::Sales => DocType::SalesInvoice,
            Self::Purchase => DocType::PurchaseInvoice,
        }
    }

    /// Returns the kind of party the invoice is addressed to.
    #[must_use]
    pub const fn party_kind(&self) -> EntityKind {
        match self {
            Self::Sales => EntityKind::Customer,
            Self::Purchase => EntityKind::Supplier,
        }
    }

    /// Returns the request field carrying the party.
    #[must_use]
    pub const fn party_field(&self) -> &'static str {
        match self {
            Self::Sales => "customer",
            Self::Purchase => "supplier",
        }
    }
}

impl fmt::Display for InvoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.doctype().as_str())
    }
}

/// How a tax row is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeType {
    /// Percentage of the net total.
    #[default]
    #[serde(rename = "On Net Total")]
    OnNetTotal,
    /// Fixed amount.
    #[serde(rename = "Actual")]
    Actual,
}

/// Optional header fields an invoice accepts besides the typed ones.
pub const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("bill_no", FieldType::Text),
    FieldSpec::new("bill_date", FieldType::Date),
    FieldSpec::new("po_no", FieldType::Text),
    FieldSpec::new("po_date", FieldType::Date),
    FieldSpec::new("currency", FieldType::Text),
    FieldSpec::new("cost_center", FieldType::Text),
    FieldSpec::new("project", FieldType::Text),
    FieldSpec::new("remarks", FieldType::Text),
    FieldSpec::new("terms", FieldType::Text),
    FieldSpec::new("is_return", FieldType::Bool),
    FieldSpec::new("update_stock", FieldType::Bool),
];

/// Optional item row fields besides the typed ones.
pub const ITEM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("description", FieldType::Text),
    FieldSpec::new("uom", FieldType::Text),
    FieldSpec::new("warehouse", FieldType::Text),
    FieldSpec::new("cost_center", FieldType::Text),
    FieldSpec::new("income_account", FieldType::Text),
    FieldSpec::new("expense_account", FieldType::Text),
    FieldSpec::new("discount_percentage", FieldType::Decimal),
];

/// Optional tax row fields besides the typed ones.
pub const TAX_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("cost_center", FieldType::Text),
    FieldSpec::new("included_in_print_rate", FieldType::Bool),
];

/// An item row as sent by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    /// Item code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    /// Item name, used when the item is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Item group, used when the item is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_group: Option<String>,
    /// Quantity; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    /// Unit rate; defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    /// Any other row fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A tax row as sent by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTaxInput {
    /// Tax account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_head: Option<String>,
    /// Computation; defaults to `On Net Total`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_type: Option<ChargeType>,
    /// Percentage for `On Net Total`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    /// Amount for `Actual`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,
    /// Description; defaults to the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other row fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An invoice as sent by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceInput {
    /// Customer (sales invoices).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Supplier (purchase invoices).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Company; defaults to the configured company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Posting date; defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<NaiveDate>,
    /// Due date; defaults to the posting date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Item rows.
    #[serde(default)]
    pub items: Vec<InvoiceItemInput>,
    /// Tax rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taxes: Vec<InvoiceTaxInput>,
    /// Any other header fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated item row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Position, starting at 1.
    pub idx: u32,
    /// Item code.
    pub item_code: String,
    /// Item name.
    pub item_name: String,
    /// Item group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_group: Option<String>,
    /// Quantity.
    pub qty: Decimal,
    /// Unit rate.
    pub rate: Decimal,
    /// `qty * rate` at currency precision.
    pub amount: Decimal,
    /// Recognized optional fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A validated tax row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTax {
    /// Position, starting at 1.
    pub idx: u32,
    /// Tax account.
    pub account_head: String,
    /// Computation.
    pub charge_type: ChargeType,
    /// Percentage, for `On Net Total`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    /// Computed tax amount.
    pub tax_amount: Decimal,
    /// Description.
    pub description: String,
    /// Recognized optional fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A validated invoice in Draft stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Customer (sales invoices).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Supplier (purchase invoices).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    /// Company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Item rows.
    pub items: Vec<InvoiceItem>,
    /// Tax rows.
    #[serde(default)]
    pub taxes: Vec<InvoiceTax>,
    /// Sum of item amounts.
    pub net_total: Decimal,
    /// Sum of tax amounts.
    pub total_taxes_and_charges: Decimal,
    /// Net total plus taxes.
    pub grand_total: Decimal,
    /// Recognized optional header fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Invoice {
    /// Returns the customer or supplier.
    #[must_use]
    pub fn party(&self) -> Option<&str> {
        self.customer.as_deref().or(self.supplier.as_deref())
    }
}

impl From<InvoiceItem> for InvoiceItemInput {
    fn from(item: InvoiceItem) -> Self {
        Self {
            item_code: Some(item.item_code),
            item_name: Some(item.item_name),
            item_group: item.item_group,
            qty: Some(item.qty),
            rate: Some(item.rate),
            extra: item.extra.into_iter().collect(),
        }
    }
}

impl From<InvoiceTax> for InvoiceTaxInput {
    fn from(tax: InvoiceTax) -> Self {
        let tax_amount = match tax.charge_type {
            ChargeType::Actual => Some(tax.tax_amount),
            ChargeType::OnNetTotal => None,
        };
        Self {
            account_head: Some(tax.account_head),
            charge_type: Some(tax.charge_type),
            rate: tax.rate,
            tax_amount,
            description: Some(tax.description),
            extra: tax.extra.into_iter().collect(),
        }
    }
}

impl From<Invoice> for InvoiceInput {
    fn from(invoice: Invoice) -> Self {
        Self {
            customer: invoice.customer,
            supplier: invoice.supplier,
            company: invoice.company,
            posting_date: Some(invoice.posting_date),
            due_date: Some(invoice.due_date),
            items: invoice.items.into_iter().map(Into::into).collect(),
            taxes: invoice.taxes.into_iter().map(Into::into).collect(),
            extra: invoice.extra.into_iter().collect(),
        }
    }
}

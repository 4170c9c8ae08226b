//! Journal entry domain types.
//!
//! `JournalEntryInput` is what callers send; `JournalEntry` is the validated
//! Draft payload the builder hands to persistence. Amounts are always
//! `Decimal`, and JSON numbers or numeric strings are both accepted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::{FieldSpec, FieldType};

/// Classification of a journal entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherKind {
    /// General journal entry.
    #[default]
    #[serde(rename = "Journal Entry")]
    JournalEntry,
    /// Entry between two companies of the same group.
    #[serde(rename = "Inter Company Journal Entry")]
    InterCompanyJournalEntry,
    /// Bank transaction.
    #[serde(rename = "Bank Entry")]
    BankEntry,
    /// Cash transaction.
    #[serde(rename = "Cash Entry")]
    CashEntry,
    /// Credit card transaction.
    #[serde(rename = "Credit Card Entry")]
    CreditCardEntry,
    /// Debit note.
    #[serde(rename = "Debit Note")]
    DebitNote,
    /// Credit note.
    #[serde(rename = "Credit Note")]
    CreditNote,
    /// Transfer between cash and bank.
    #[serde(rename = "Contra Entry")]
    ContraEntry,
    /// Excise duty.
    #[serde(rename = "Excise Entry")]
    ExciseEntry,
    /// Write-off.
    #[serde(rename = "Write Off Entry")]
    WriteOffEntry,
    /// Opening balances.
    #[serde(rename = "Opening Entry")]
    OpeningEntry,
    /// Asset depreciation.
    #[serde(rename = "Depreciation Entry")]
    DepreciationEntry,
    /// Revaluation of foreign currency balances.
    #[serde(rename = "Exchange Rate Revaluation")]
    ExchangeRateRevaluation,
    /// Recognition of deferred revenue.
    #[serde(rename = "Deferred Revenue")]
    DeferredRevenue,
    /// Recognition of deferred expense.
    #[serde(rename = "Deferred Expense")]
    DeferredExpense,
}

impl VoucherKind {
    /// Returns the display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JournalEntry => "Journal Entry",
            Self::InterCompanyJournalEntry => "Inter Company Journal Entry",
            Self::BankEntry => "Bank Entry",
            Self::CashEntry => "Cash Entry",
            Self::CreditCardEntry => "Credit Card Entry",
            Self::DebitNote => "Debit Note",
            Self::CreditNote => "Credit Note",
            Self::ContraEntry => "Contra Entry",
            Self::ExciseEntry => "Excise Entry",
            Self::WriteOffEntry => "Write Off Entry",
            Self::OpeningEntry => "Opening Entry",
            Self::DepreciationEntry => "Depreciation Entry",
            Self::ExchangeRateRevaluation => "Exchange Rate Revaluation",
            Self::DeferredRevenue => "Deferred Revenue",
            Self::DeferredExpense => "Deferred Expense",
        }
    }
}

/// Optional header fields a journal entry accepts besides the typed ones.
pub const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("cheque_no", FieldType::Text),
    FieldSpec::new("cheque_date", FieldType::Date),
    FieldSpec::new("bill_no", FieldType::Text),
    FieldSpec::new("bill_date", FieldType::Date),
    FieldSpec::new("due_date", FieldType::Date),
    FieldSpec::new("is_opening", FieldType::Text),
    FieldSpec::new("multi_currency", FieldType::Bool),
    FieldSpec::new("write_off_amount", FieldType::Decimal),
    FieldSpec::new("pay_to_recd_from", FieldType::Text),
    FieldSpec::new("letter_head", FieldType::Text),
    FieldSpec::new("finance_book", FieldType::Text),
];

/// Optional line fields a journal entry accepts besides the typed ones.
pub const LINE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("is_advance", FieldType::Text),
    FieldSpec::new("against_account", FieldType::Text),
    FieldSpec::new("bank_account", FieldType::Text),
];

/// One line of a journal entry as sent by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Ledger account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Debit amount; missing means zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_amount: Option<Decimal>,
    /// Credit amount; missing means zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_amount: Option<Decimal>,
    /// Cost center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    /// Party type (Customer, Supplier, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_type: Option<String>,
    /// Party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// Line remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Referenced document type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
    /// Referenced document name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_name: Option<String>,
    /// Project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Any other line fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A journal entry as sent by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryInput {
    /// Company the entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Posting date; defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_date: Option<NaiveDate>,
    /// Voucher kind; defaults to `Journal Entry`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_kind: Option<VoucherKind>,
    /// Free-text remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Lines, in order.
    #[serde(default)]
    pub lines: Vec<JournalLineInput>,
    /// Any other header fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated journal line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Position in the entry, starting at 1.
    pub idx: u32,
    /// Ledger account.
    pub account: String,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Cost center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    /// Party type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_type: Option<String>,
    /// Party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// Line remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Referenced document type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
    /// Referenced document name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_name: Option<String>,
    /// Project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Recognized optional fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Debit and credit totals of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
}

/// A validated journal entry in Draft stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Company.
    pub company: String,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Voucher kind.
    pub voucher_kind: VoucherKind,
    /// Free-text remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Lines, in input order.
    pub lines: Vec<JournalLine>,
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Recognized optional header fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl JournalEntry {
    /// Returns the entry totals.
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        JournalTotals {
            total_debit: self.total_debit,
            total_credit: self.total_credit,
        }
    }
}

impl From<JournalLine> for JournalLineInput {
    fn from(line: JournalLine) -> Self {
        Self {
            account: Some(line.account),
            debit_amount: Some(line.debit_amount),
            credit_amount: Some(line.credit_amount),
            cost_center: line.cost_center,
            party_type: line.party_type,
            party: line.party,
            remark: line.remark,
            reference_type: line.reference_type,
            reference_name: line.reference_name,
            project: line.project,
            extra: line.extra.into_iter().collect(),
        }
    }
}

impl From<JournalEntry> for JournalEntryInput {
    fn from(entry: JournalEntry) -> Self {
        Self {
            company: Some(entry.company),
            posting_date: Some(entry.posting_date),
            voucher_kind: Some(entry.voucher_kind),
            remark: entry.remark,
            lines: entry.lines.into_iter().map(Into::into).collect(),
            extra: entry.extra.into_iter().collect(),
        }
    }
}

//! Journal service for balanced transaction construction.
//!
//! This module turns caller input into a validated Draft journal entry. It
//! performs read-only existence checks through an `EntityLookup` and never
//! writes anything.

use ledgerbridge_shared::types::within_tolerance;
use rust_decimal::Decimal;

use super::error::JournalError;
use super::types::{
    HEADER_FIELDS, JournalEntry, JournalEntryInput, JournalLine, JournalLineInput, LINE_FIELDS,
};
use crate::context::{BuildContext, DocumentDraft};
use crate::fields::merge_fields;
use crate::lookup::{EntityKind, EntityLookup, EntityRefs, non_blank};
use crate::master::MasterRecordPlan;

/// Minimum number of lines in a journal entry.
pub const MIN_LINES: usize = 2;

/// Journal service for building balanced journal entries.
///
/// This service contains pure business logic with no database dependencies.
pub struct JournalService;

impl JournalService {
    /// Build a Draft journal entry from caller input.
    ///
    /// Steps, failing fast on the first error:
    /// 1. Require a company and at least 2 lines
    /// 2. Check the company exists
    /// 3. For each line: require an existing account, then exactly one
    ///    strictly positive amount, and accumulate totals
    /// 4. Check debits equal credits within 0.01
    /// 5. Assemble the header with defaults
    ///
    /// Updates go through the same function with the full replacement
    /// line set.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` if validation fails, or `JournalError::Lookup`
    /// if the entity store fails.
    pub fn build<L>(
        input: &JournalEntryInput,
        ctx: &BuildContext,
        lookup: &L,
    ) -> Result<DocumentDraft<JournalEntry>, JournalError>
    where
        L: EntityLookup + ?Sized,
    {
        let company = non_blank(input.company.as_deref()).ok_or(
            JournalError::MissingRequiredField {
                field: "company",
                row: None,
            },
        )?;
        if input.lines.len() < MIN_LINES {
            return Err(JournalError::InsufficientLines {
                count: input.lines.len(),
            });
        }

        if !lookup.exists(EntityKind::Company, company)? {
            return Err(JournalError::UnknownEntity {
                kind: EntityKind::Company,
                name: company.to_string(),
                row: None,
            });
        }

        let mut lines = Vec::with_capacity(input.lines.len());
        let mut ignored_fields = Vec::new();
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for (index, line) in input.lines.iter().enumerate() {
            let row = index + 1;
            let validated = Self::build_line(line, row, ctx, lookup, &mut ignored_fields)?;
            total_debit = total_debit
                .checked_add(validated.debit_amount)
                .ok_or(JournalError::AmountOverflow { field: "total_debit" })?;
            total_credit = total_credit
                .checked_add(validated.credit_amount)
                .ok_or(JournalError::AmountOverflow { field: "total_credit" })?;
            lines.push(validated);
        }

        if !within_tolerance(total_debit, total_credit) {
            return Err(JournalError::UnbalancedTransaction {
                total_debit,
                total_credit,
            });
        }

        let header = merge_fields(HEADER_FIELDS, &input.extra, ctx.field_policy)?;
        ignored_fields.extend(header.ignored);

        let entry = JournalEntry {
            company: company.to_string(),
            posting_date: input.posting_date.unwrap_or(ctx.today),
            voucher_kind: input.voucher_kind.unwrap_or_default(),
            remark: input.remark.clone(),
            lines,
            total_debit,
            total_credit,
            extra: header.fields,
        };

        Ok(DocumentDraft {
            document: entry,
            masters: MasterRecordPlan::default(),
            ignored_fields,
        })
    }

    /// Validate one line and carry its pass-through attributes.
    fn build_line<L>(
        line: &JournalLineInput,
        row: usize,
        ctx: &BuildContext,
        lookup: &L,
        ignored_fields: &mut Vec<String>,
    ) -> Result<JournalLine, JournalError>
    where
        L: EntityLookup + ?Sized,
    {
        let account = non_blank(line.account.as_deref()).ok_or(
            JournalError::MissingRequiredField {
                field: "account",
                row: Some(row),
            },
        )?;
        if !lookup.exists(EntityKind::Account, account)? {
            return Err(JournalError::UnknownEntity {
                kind: EntityKind::Account,
                name: account.to_string(),
                row: Some(row),
            });
        }

        let debit = line.debit_amount.unwrap_or(Decimal::ZERO);
        let credit = line.credit_amount.unwrap_or(Decimal::ZERO);

        if debit < Decimal::ZERO || credit < Decimal::ZERO {
            return Err(JournalError::NegativeLineAmount {
                row,
                account: account.to_string(),
            });
        }
        if debit > Decimal::ZERO && credit > Decimal::ZERO {
            return Err(JournalError::AmbiguousLineAmount {
                row,
                account: account.to_string(),
            });
        }
        if debit.is_zero() && credit.is_zero() {
            return Err(JournalError::EmptyLineAmount {
                row,
                account: account.to_string(),
            });
        }

        let extra = merge_fields(LINE_FIELDS, &line.extra, ctx.field_policy)?;
        ignored_fields.extend(extra.ignored.into_iter().map(|f| format!("lines[{row}].{f}")));

        Ok(JournalLine {
            idx: u32::try_from(row).unwrap_or(u32::MAX),
            account: account.to_string(),
            debit_amount: debit,
            credit_amount: credit,
            cost_center: line.cost_center.clone(),
            party_type: line.party_type.clone(),
            party: line.party.clone(),
            remark: line.remark.clone(),
            reference_type: line.reference_type.clone(),
            reference_name: line.reference_name.clone(),
            project: line.project.clone(),
            extra: extra.fields,
        })
    }

    /// Collect the master records an input references, for prefetching.
    #[must_use]
    pub fn references(input: &JournalEntryInput) -> EntityRefs {
        let mut refs = EntityRefs::new();
        refs.add(EntityKind::Company, input.company.as_deref());
        for line in &input.lines {
            refs.add(EntityKind::Account, line.account.as_deref());
        }
        refs
    }
}

//! Payment service for payment entry construction.
//!
//! Payments are posted at an exchange rate of 1: `received_amount` always
//! equals `paid_amount`.

use rust_decimal::Decimal;

use super::error::PaymentError;
use super::types::{
    HEADER_FIELDS, PaymentEntry, PaymentEntryInput, PaymentReference, PaymentReferenceInput,
    PaymentType, REFERENCE_FIELDS,
};
use crate::context::{BuildContext, DocumentDraft};
use crate::document::DocType;
use crate::fields::merge_fields;
use crate::lookup::{EntityKind, EntityLookup, EntityRefs, non_blank};
use crate::master::MasterRecordPlan;

/// Payment service for building payment entries.
pub struct PaymentService;

impl PaymentService {
    /// Build a Draft payment entry from caller input.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if validation fails, or `PaymentError::Lookup`
    /// if the entity store fails.
    pub fn build<L>(
        input: &PaymentEntryInput,
        ctx: &BuildContext,
        lookup: &L,
    ) -> Result<DocumentDraft<PaymentEntry>, PaymentError>
    where
        L: EntityLookup + ?Sized,
    {
        let party_type = input.party_type.ok_or(PaymentError::MissingRequiredField {
            field: "party_type",
            row: None,
        })?;
        let party = non_blank(input.party.as_deref()).ok_or(PaymentError::MissingRequiredField {
            field: "party",
            row: None,
        })?;
        let paid_amount = input.paid_amount.ok_or(PaymentError::MissingRequiredField {
            field: "paid_amount",
            row: None,
        })?;
        if paid_amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositivePaidAmount(paid_amount));
        }

        let company = non_blank(input.company.as_deref())
            .or(ctx.default_company.as_deref())
            .ok_or(PaymentError::MissingRequiredField {
                field: "company",
                row: None,
            })?;
        if !lookup.exists(EntityKind::Company, company)? {
            return Err(PaymentError::UnknownEntity {
                kind: EntityKind::Company,
                name: company.to_string(),
            });
        }

        let mut masters = MasterRecordPlan::default();
        if let Some(kind) = party_type.master_kind() {
            if !lookup.exists(kind, party)? {
                match kind {
                    EntityKind::Customer => masters.add_customer(party),
                    EntityKind::Supplier => masters.add_supplier(party),
                    _ => {}
                }
            }
        }

        let payment_type = party_type.payment_type();
        let (paid_from, paid_to) = Self::resolve_accounts(input, payment_type, company, lookup)?;

        let mut ignored_fields = Vec::new();
        let references = input
            .references
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                Self::build_reference(reference, index + 1, ctx, &mut ignored_fields)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total_allocated_amount = references
            .iter()
            .try_fold(Decimal::ZERO, |total, r| total.checked_add(r.allocated_amount))
            .ok_or(PaymentError::AmountOverflow {
                field: "total_allocated_amount",
            })?;
        if total_allocated_amount > paid_amount {
            return Err(PaymentError::AllocationExceedsPaidAmount {
                allocated: total_allocated_amount,
                paid: paid_amount,
            });
        }

        let header = merge_fields(HEADER_FIELDS, &input.extra, ctx.field_policy)?;
        ignored_fields.extend(header.ignored);

        Ok(DocumentDraft {
            document: PaymentEntry {
                payment_type,
                party_type,
                party: party.to_string(),
                company: company.to_string(),
                posting_date: input.posting_date.unwrap_or(ctx.today),
                paid_from,
                paid_to,
                paid_amount,
                received_amount: paid_amount,
                source_exchange_rate: Decimal::ONE,
                target_exchange_rate: Decimal::ONE,
                references,
                total_allocated_amount,
                unallocated_amount: paid_amount - total_allocated_amount,
                extra: header.fields,
            },
            masters,
            ignored_fields,
        })
    }

    /// Resolve `paid_from` and `paid_to`, falling back to company defaults.
    ///
    /// Receive moves money from the receivable account to the cash account;
    /// Pay moves it from the cash account to the payable account.
    fn resolve_accounts<L>(
        input: &PaymentEntryInput,
        payment_type: PaymentType,
        company: &str,
        lookup: &L,
    ) -> Result<(String, String), PaymentError>
    where
        L: EntityLookup + ?Sized,
    {
        let supplied_from = non_blank(input.paid_from.as_deref()).map(str::to_string);
        let supplied_to = non_blank(input.paid_to.as_deref()).map(str::to_string);

        let defaults = if supplied_from.is_none() || supplied_to.is_none() {
            lookup.company_defaults(company)?
        } else {
            None
        };
        let defaults = defaults.as_ref();

        let (default_from, default_to) = match payment_type {
            PaymentType::Receive => (
                defaults.and_then(|d| d.default_receivable_account.clone()),
                defaults.and_then(|d| d.default_cash_account.clone()),
            ),
            PaymentType::Pay => (
                defaults.and_then(|d| d.default_cash_account.clone()),
                defaults.and_then(|d| d.default_payable_account.clone()),
            ),
        };

        let paid_from = supplied_from
            .or(default_from)
            .ok_or_else(|| PaymentError::MissingDefaultAccount {
                field: "paid_from",
                company: company.to_string(),
            })?;
        let paid_to = supplied_to
            .or(default_to)
            .ok_or_else(|| PaymentError::MissingDefaultAccount {
                field: "paid_to",
                company: company.to_string(),
            })?;

        for account in [&paid_from, &paid_to] {
            if !lookup.exists(EntityKind::Account, account)? {
                return Err(PaymentError::UnknownEntity {
                    kind: EntityKind::Account,
                    name: account.clone(),
                });
            }
        }

        Ok((paid_from, paid_to))
    }

    fn build_reference(
        reference: &PaymentReferenceInput,
        row: usize,
        ctx: &BuildContext,
        ignored_fields: &mut Vec<String>,
    ) -> Result<PaymentReference, PaymentError> {
        let doctype_name = non_blank(reference.reference_doctype.as_deref()).ok_or(
            PaymentError::MissingRequiredField {
                field: "reference_doctype",
                row: Some(row),
            },
        )?;
        let reference_doctype = DocType::parse(doctype_name)
            .filter(|d| *d != DocType::PaymentEntry)
            .ok_or_else(|| PaymentError::InvalidReferenceDoctype {
                row,
                doctype: doctype_name.to_string(),
            })?;
        let reference_name = non_blank(reference.reference_name.as_deref()).ok_or(
            PaymentError::MissingRequiredField {
                field: "reference_name",
                row: Some(row),
            },
        )?;

        let allocated_amount = reference.allocated_amount.unwrap_or(Decimal::ZERO);
        let outstanding_amount = reference.outstanding_amount.unwrap_or(Decimal::ZERO);
        if allocated_amount < Decimal::ZERO || outstanding_amount < Decimal::ZERO {
            return Err(PaymentError::NegativeAllocation { row });
        }
        if outstanding_amount > Decimal::ZERO && allocated_amount > outstanding_amount {
            return Err(PaymentError::AllocationExceedsOutstanding {
                row,
                allocated: allocated_amount,
                outstanding: outstanding_amount,
            });
        }

        let extra = merge_fields(REFERENCE_FIELDS, &reference.extra, ctx.field_policy)?;
        ignored_fields.extend(
            extra
                .ignored
                .into_iter()
                .map(|f| format!("references[{row}].{f}")),
        );

        Ok(PaymentReference {
            idx: u32::try_from(row).unwrap_or(u32::MAX),
            reference_doctype,
            reference_name: reference_name.to_string(),
            allocated_amount,
            outstanding_amount,
            extra: extra.fields,
        })
    }

    /// Collect the master records an input references, for prefetching.
    #[must_use]
    pub fn references(input: &PaymentEntryInput) -> EntityRefs {
        let mut refs = EntityRefs::new();
        refs.add(EntityKind::Company, input.company.as_deref());
        if let Some(kind) = input.party_type.and_then(|p| p.master_kind()) {
            refs.add(kind, input.party.as_deref());
        }
        refs.add(EntityKind::Account, input.paid_from.as_deref());
        refs.add(EntityKind::Account, input.paid_to.as_deref());
        refs
    }
}

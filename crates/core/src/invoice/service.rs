//! Invoice service for sales and purchase invoice construction.

use ledgerbridge_shared::types::{FieldPolicy, percentage_of, round_currency};
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::types::{
    ChargeType, HEADER_FIELDS, ITEM_FIELDS, Invoice, InvoiceInput, InvoiceItem, InvoiceItemInput,
    InvoiceKind, InvoiceTax, InvoiceTaxInput, TAX_FIELDS,
};
use crate::context::{BuildContext, DocumentDraft};
use crate::fields::{FieldError, merge_fields};
use crate::lookup::{EntityKind, EntityLookup, EntityRefs, non_blank};
use crate::master::MasterRecordPlan;

/// Invoice service for building sales and purchase invoices.
///
/// Missing customers, suppliers and items are not an error: they are added to
/// the returned `MasterRecordPlan` and created by the persistence layer.
pub struct InvoiceService;

impl InvoiceService {
    /// Build a Draft invoice from caller input.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` if validation fails, or `InvoiceError::Lookup`
    /// if the entity store fails.
    pub fn build<L>(
        kind: InvoiceKind,
        input: &InvoiceInput,
        ctx: &BuildContext,
        lookup: &L,
    ) -> Result<DocumentDraft<Invoice>, InvoiceError>
    where
        L: EntityLookup + ?Sized,
    {
        let (party, other_party) = match kind {
            InvoiceKind::Sales => (&input.customer, &input.supplier),
            InvoiceKind::Purchase => (&input.supplier, &input.customer),
        };
        let party = non_blank(party.as_deref()).ok_or(InvoiceError::MissingRequiredField {
            field: kind.party_field(),
            row: None,
        })?;
        if input.items.is_empty() {
            return Err(InvoiceError::NoItems);
        }

        let posting_date = input.posting_date.unwrap_or(ctx.today);
        let due_date = input.due_date.unwrap_or(posting_date);
        if due_date < posting_date {
            return Err(InvoiceError::DueDateBeforePostingDate {
                posting_date,
                due_date,
            });
        }

        let company = non_blank(input.company.as_deref())
            .map(str::to_string)
            .or_else(|| ctx.default_company.clone());
        if let Some(company) = &company {
            if !lookup.exists(EntityKind::Company, company)? {
                return Err(InvoiceError::UnknownEntity {
                    kind: EntityKind::Company,
                    name: company.clone(),
                });
            }
        }

        let mut masters = MasterRecordPlan::default();
        let mut ignored_fields = Vec::new();

        if !lookup.exists(kind.party_kind(), party)? {
            match kind {
                InvoiceKind::Sales => masters.add_customer(party),
                InvoiceKind::Purchase => masters.add_supplier(party),
            }
        }

        if other_party.is_some() {
            let field = match kind {
                InvoiceKind::Sales => "supplier",
                InvoiceKind::Purchase => "customer",
            };
            match ctx.field_policy {
                FieldPolicy::Ignore => ignored_fields.push(field.to_string()),
                FieldPolicy::Reject => {
                    return Err(FieldError::UnknownField {
                        field: field.to_string(),
                    }
                    .into());
                }
            }
        }

        let mut items = Vec::with_capacity(input.items.len());
        for (index, item) in input.items.iter().enumerate() {
            let row = index + 1;
            items.push(Self::build_item(
                item,
                row,
                ctx,
                lookup,
                &mut masters,
                &mut ignored_fields,
            )?);
        }
        let net_total = checked_sum(items.iter().map(|i| i.amount), "net_total")?;

        let mut taxes = Vec::with_capacity(input.taxes.len());
        for (index, tax) in input.taxes.iter().enumerate() {
            taxes.push(Self::build_tax(
                tax,
                index + 1,
                net_total,
                ctx,
                lookup,
                &mut ignored_fields,
            )?);
        }
        let total_taxes_and_charges =
            checked_sum(taxes.iter().map(|t| t.tax_amount), "total_taxes_and_charges")?;
        let grand_total = net_total.checked_add(total_taxes_and_charges).ok_or(
            InvoiceError::AmountOverflow {
                field: "grand_total",
                row: None,
            },
        )?;

        let header = merge_fields(HEADER_FIELDS, &input.extra, ctx.field_policy)?;
        ignored_fields.extend(header.ignored);

        let (customer, supplier) = match kind {
            InvoiceKind::Sales => (Some(party.to_string()), None),
            InvoiceKind::Purchase => (None, Some(party.to_string())),
        };

        Ok(DocumentDraft {
            document: Invoice {
                customer,
                supplier,
                company,
                posting_date,
                due_date,
                items,
                taxes,
                net_total,
                total_taxes_and_charges,
                grand_total,
                extra: header.fields,
            },
            masters,
            ignored_fields,
        })
    }

    fn build_item<L>(
        item: &InvoiceItemInput,
        row: usize,
        ctx: &BuildContext,
        lookup: &L,
        masters: &mut MasterRecordPlan,
        ignored_fields: &mut Vec<String>,
    ) -> Result<InvoiceItem, InvoiceError>
    where
        L: EntityLookup + ?Sized,
    {
        let item_code = non_blank(item.item_code.as_deref()).ok_or(
            InvoiceError::MissingRequiredField {
                field: "item_code",
                row: Some(row),
            },
        )?;

        let qty = item.qty.unwrap_or(Decimal::ONE);
        if qty <= Decimal::ZERO {
            return Err(InvoiceError::NonPositiveQuantity {
                row,
                item_code: item_code.to_string(),
                qty,
            });
        }
        let rate = item.rate.unwrap_or(Decimal::ZERO);
        if rate < Decimal::ZERO {
            return Err(InvoiceError::NegativeRate {
                row,
                item_code: item_code.to_string(),
                rate,
            });
        }

        if !lookup.exists(EntityKind::Item, item_code)? {
            masters.add_item(
                item_code,
                non_blank(item.item_name.as_deref()),
                non_blank(item.item_group.as_deref()),
            );
        }

        let amount = qty
            .checked_mul(rate)
            .map(round_currency)
            .ok_or(InvoiceError::AmountOverflow {
                field: "amount",
                row: Some(row),
            })?;

        let extra = merge_fields(ITEM_FIELDS, &item.extra, ctx.field_policy)?;
        ignored_fields.extend(extra.ignored.into_iter().map(|f| format!("items[{row}].{f}")));

        Ok(InvoiceItem {
            idx: u32::try_from(row).unwrap_or(u32::MAX),
            item_code: item_code.to_string(),
            item_name: non_blank(item.item_name.as_deref())
                .unwrap_or(item_code)
                .to_string(),
            item_group: item.item_group.clone(),
            qty,
            rate,
            amount,
            extra: extra.fields,
        })
    }

    fn build_tax<L>(
        tax: &InvoiceTaxInput,
        row: usize,
        net_total: Decimal,
        ctx: &BuildContext,
        lookup: &L,
        ignored_fields: &mut Vec<String>,
    ) -> Result<InvoiceTax, InvoiceError>
    where
        L: EntityLookup + ?Sized,
    {
        let account_head = non_blank(tax.account_head.as_deref()).ok_or(
            InvoiceError::MissingRequiredField {
                field: "account_head",
                row: Some(row),
            },
        )?;
        if !lookup.exists(EntityKind::Account, account_head)? {
            return Err(InvoiceError::UnknownEntity {
                kind: EntityKind::Account,
                name: account_head.to_string(),
            });
        }

        let charge_type = tax.charge_type.unwrap_or_default();
        let (rate, tax_amount) = match charge_type {
            ChargeType::OnNetTotal => {
                let rate = tax.rate.ok_or(InvoiceError::MissingRequiredField {
                    field: "rate",
                    row: Some(row),
                })?;
                let amount =
                    percentage_of(net_total, rate).ok_or(InvoiceError::AmountOverflow {
                        field: "tax_amount",
                        row: Some(row),
                    })?;
                (Some(rate), amount)
            }
            ChargeType::Actual => {
                let amount = tax.tax_amount.ok_or(InvoiceError::MissingRequiredField {
                    field: "tax_amount",
                    row: Some(row),
                })?;
                (None, round_currency(amount))
            }
        };

        let extra = merge_fields(TAX_FIELDS, &tax.extra, ctx.field_policy)?;
        ignored_fields.extend(extra.ignored.into_iter().map(|f| format!("taxes[{row}].{f}")));

        Ok(InvoiceTax {
            idx: u32::try_from(row).unwrap_or(u32::MAX),
            account_head: account_head.to_string(),
            charge_type,
            rate,
            tax_amount,
            description: non_blank(tax.description.as_deref())
                .unwrap_or(account_head)
                .to_string(),
            extra: extra.fields,
        })
    }

    /// Collect the master records an input references, for prefetching.
    #[must_use]
    pub fn references(kind: InvoiceKind, input: &InvoiceInput) -> EntityRefs {
        let mut refs = EntityRefs::new();
        let party = match kind {
            InvoiceKind::Sales => input.customer.as_deref(),
            InvoiceKind::Purchase => input.supplier.as_deref(),
        };
        refs.add(kind.party_kind(), party);
        refs.add(EntityKind::Company, input.company.as_deref());
        for item in &input.items {
            refs.add(EntityKind::Item, item.item_code.as_deref());
        }
        for tax in &input.taxes {
            refs.add(EntityKind::Account, tax.account_head.as_deref());
        }
        refs
    }
}

/// Sums amounts, failing instead of overflowing.
fn checked_sum(
    mut amounts: impl Iterator<Item = Decimal>,
    field: &'static str,
) -> Result<Decimal, InvoiceError> {
    amounts.try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .ok_or(InvoiceError::AmountOverflow { field, row: None })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::KnownEntities;
    use crate::master::DEFAULT_ITEM_GROUP;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn ctx() -> BuildContext {
        BuildContext::new(today())
    }

    fn known() -> KnownEntities {
        KnownEntities::new()
            .with(EntityKind::Company, "Acme")
            .with(EntityKind::Customer, "Jane")
            .with(EntityKind::Supplier, "Globex")
            .with(EntityKind::Item, "WIDGET")
            .with(EntityKind::Account, "VAT")
    }

    fn item(code: &str, qty: Option<Decimal>, rate: Option<Decimal>) -> InvoiceItemInput {
        InvoiceItemInput {
            item_code: Some(code.to_string()),
            qty,
            rate,
            ..Default::default()
        }
    }

    fn sales(items: Vec<InvoiceItemInput>) -> InvoiceInput {
        InvoiceInput {
            customer: Some("Jane".to_string()),
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_sales_invoice_totals() {
        let mut input = sales(vec![
            item("WIDGET", Some(dec!(2)), Some(dec!(50))),
            item("WIDGET", Some(dec!(1.5)), Some(dec!(10))),
        ]);
        input.taxes = vec![InvoiceTaxInput {
            account_head: Some("VAT".to_string()),
            rate: Some(dec!(15)),
            ..Default::default()
        }];

        let draft = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap();
        let invoice = draft.document;

        assert_eq!(invoice.items[0].amount, dec!(100));
        assert_eq!(invoice.items[1].amount, dec!(15));
        assert_eq!(invoice.net_total, dec!(115));
        assert_eq!(invoice.taxes[0].tax_amount, dec!(17.25));
        assert_eq!(invoice.taxes[0].description, "VAT");
        assert_eq!(invoice.total_taxes_and_charges, dec!(17.25));
        assert_eq!(invoice.grand_total, dec!(132.25));
        assert_eq!(invoice.customer.as_deref(), Some("Jane"));
        assert_eq!(invoice.supplier, None);
        assert_eq!(invoice.posting_date, today());
        assert_eq!(invoice.due_date, today());
        assert!(draft.masters.is_empty());
    }

    #[test]
    fn test_item_defaults() {
        let input = sales(vec![item("WIDGET", None, None)]);

        let invoice = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known())
            .unwrap()
            .document;

        assert_eq!(invoice.items[0].qty, dec!(1));
        assert_eq!(invoice.items[0].rate, dec!(0));
        assert_eq!(invoice.items[0].amount, dec!(0));
        assert_eq!(invoice.items[0].item_name, "WIDGET");
    }

    #[test]
    fn test_missing_masters_are_planned() {
        let input = InvoiceInput {
            supplier: Some("Initech".to_string()),
            items: vec![InvoiceItemInput {
                item_code: Some("BOLT-10".to_string()),
                item_name: Some("Bolt 10mm".to_string()),
                rate: Some(dec!(0.25)),
                qty: Some(dec!(40)),
                ..Default::default()
            }],
            ..Default::default()
        };

        let draft = InvoiceService::build(InvoiceKind::Purchase, &input, &ctx(), &known()).unwrap();

        assert_eq!(draft.masters.suppliers[0].supplier_name, "Initech");
        assert!(draft.masters.customers.is_empty());
        assert_eq!(draft.masters.items[0].item_code, "BOLT-10");
        assert_eq!(draft.masters.items[0].item_name, "Bolt 10mm");
        assert_eq!(draft.masters.items[0].item_group, DEFAULT_ITEM_GROUP);
        assert_eq!(draft.document.grand_total, dec!(10));
    }

    #[test]
    fn test_party_required() {
        let mut input = sales(vec![item("WIDGET", None, None)]);
        input.customer = None;

        assert_eq!(
            InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap_err(),
            InvoiceError::MissingRequiredField {
                field: "customer",
                row: None
            }
        );
    }

    #[test]
    fn test_no_items() {
        assert_eq!(
            InvoiceService::build(InvoiceKind::Sales, &sales(vec![]), &ctx(), &known())
                .unwrap_err(),
            InvoiceError::NoItems
        );
    }

    #[rstest]
    #[case(Some(dec!(0)), None, "NON_POSITIVE_QUANTITY")]
    #[case(Some(dec!(-1)), None, "NON_POSITIVE_QUANTITY")]
    #[case(None, Some(dec!(-5)), "NEGATIVE_RATE")]
    fn test_item_amount_rules(
        #[case] qty: Option<Decimal>,
        #[case] rate: Option<Decimal>,
        #[case] code: &str,
    ) {
        let input = sales(vec![item("WIDGET", qty, rate)]);

        let err = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap_err();

        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_due_date_before_posting_date() {
        let mut input = sales(vec![item("WIDGET", None, Some(dec!(1)))]);
        input.posting_date = NaiveDate::from_ymd_opt(2026, 5, 10);
        input.due_date = NaiveDate::from_ymd_opt(2026, 5, 9);

        assert!(matches!(
            InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()),
            Err(InvoiceError::DueDateBeforePostingDate { .. })
        ));
    }

    #[test]
    fn test_due_date_defaults_to_posting_date() {
        let mut input = sales(vec![item("WIDGET", None, Some(dec!(1)))]);
        input.posting_date = NaiveDate::from_ymd_opt(2026, 5, 10);

        let invoice = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known())
            .unwrap()
            .document;

        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2026, 5, 10).unwrap());
    }

    #[test]
    fn test_actual_tax_and_bankers_rounding() {
        let mut input = sales(vec![item("WIDGET", Some(dec!(1)), Some(dec!(0.50)))]);
        input.taxes = vec![
            InvoiceTaxInput {
                account_head: Some("VAT".to_string()),
                rate: Some(dec!(5)),
                ..Default::default()
            },
            InvoiceTaxInput {
                account_head: Some("VAT".to_string()),
                charge_type: Some(ChargeType::Actual),
                tax_amount: Some(dec!(3)),
                description: Some("Freight".to_string()),
                ..Default::default()
            },
        ];

        let invoice = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known())
            .unwrap()
            .document;

        // 0.50 * 5% = 0.025, rounds half to even
        assert_eq!(invoice.taxes[0].tax_amount, dec!(0.02));
        assert_eq!(invoice.taxes[1].tax_amount, dec!(3));
        assert_eq!(invoice.taxes[1].description, "Freight");
        assert_eq!(invoice.grand_total, dec!(3.52));
    }

    #[test]
    fn test_unknown_tax_account() {
        let mut input = sales(vec![item("WIDGET", None, Some(dec!(1)))]);
        input.taxes = vec![InvoiceTaxInput {
            account_head: Some("GST".to_string()),
            rate: Some(dec!(10)),
            ..Default::default()
        }];

        assert_eq!(
            InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap_err(),
            InvoiceError::UnknownEntity {
                kind: EntityKind::Account,
                name: "GST".to_string()
            }
        );
    }

    #[test]
    fn test_company_defaults_from_context() {
        let input = sales(vec![item("WIDGET", None, Some(dec!(1)))]);
        let ctx = ctx().with_default_company(Some("Acme".to_string()));

        let invoice = InvoiceService::build(InvoiceKind::Sales, &input, &ctx, &known())
            .unwrap()
            .document;
        assert_eq!(invoice.company.as_deref(), Some("Acme"));

        let ctx = ctx.with_default_company(Some("Initech".to_string()));
        assert!(matches!(
            InvoiceService::build(InvoiceKind::Sales, &input, &ctx, &known()),
            Err(InvoiceError::UnknownEntity {
                kind: EntityKind::Company,
                ..
            })
        ));
    }

    #[test]
    fn test_other_party_follows_field_policy() {
        let input: InvoiceInput = serde_json::from_value(json!({
            "customer": "Jane",
            "supplier": "Globex",
            "remarks": "Thanks",
            "items": [{"item_code": "WIDGET", "rate": 5, "warehouse": "Stores", "colour": "red"}]
        }))
        .unwrap();

        let draft = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap();
        assert_eq!(
            draft.ignored_fields,
            vec!["supplier".to_string(), "items[1].colour".to_string()]
        );
        assert_eq!(draft.document.extra["remarks"], json!("Thanks"));
        assert_eq!(draft.document.items[0].extra["warehouse"], json!("Stores"));

        let strict = ctx().with_policy(FieldPolicy::Reject);
        assert_eq!(
            InvoiceService::build(InvoiceKind::Sales, &input, &strict, &known()).unwrap_err(),
            InvoiceError::Field(FieldError::UnknownField {
                field: "supplier".to_string()
            })
        );
    }

    #[test]
    fn test_tax_rows_follow_field_policy() {
        let input: InvoiceInput = serde_json::from_value(json!({
            "customer": "Jane",
            "items": [{"item_code": "WIDGET", "rate": 100}],
            "taxes": [{"account_head": "VAT", "rate": 10, "cost_center": "Main", "colour": "red"}]
        }))
        .unwrap();

        let draft = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap();
        assert_eq!(draft.ignored_fields, vec!["taxes[1].colour".to_string()]);
        assert_eq!(draft.document.taxes[0].extra["cost_center"], json!("Main"));
        assert!(!draft.document.taxes[0].extra.contains_key("colour"));

        let strict = ctx().with_policy(FieldPolicy::Reject);
        assert_eq!(
            InvoiceService::build(InvoiceKind::Sales, &input, &strict, &known()).unwrap_err(),
            InvoiceError::Field(FieldError::UnknownField {
                field: "colour".to_string()
            })
        );
    }

    #[test]
    fn test_tax_field_type_is_checked() {
        let input: InvoiceInput = serde_json::from_value(json!({
            "customer": "Jane",
            "items": [{"item_code": "WIDGET", "rate": 100}],
            "taxes": [{"account_head": "VAT", "rate": 10, "included_in_print_rate": "yes"}]
        }))
        .unwrap();

        assert!(matches!(
            InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()),
            Err(InvoiceError::Field(FieldError::InvalidFieldType { .. }))
        ));
    }

    #[test]
    fn test_amounts_out_of_range_are_rejected() {
        let huge = dec!(50000000000000000000000000000);

        let input = sales(vec![item("WIDGET", Some(huge), Some(dec!(10)))]);
        let err = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap_err();
        assert_eq!(
            err,
            InvoiceError::AmountOverflow {
                field: "amount",
                row: Some(1)
            }
        );
        assert_eq!(err.error_code(), "AMOUNT_OVERFLOW");
        assert!(err.is_validation());

        let input = sales(vec![
            item("WIDGET", Some(dec!(1)), Some(huge)),
            item("WIDGET", Some(dec!(1)), Some(huge)),
        ]);
        assert_eq!(
            InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap_err(),
            InvoiceError::AmountOverflow {
                field: "net_total",
                row: None
            }
        );

        let mut input = sales(vec![item("WIDGET", Some(dec!(1)), Some(huge))]);
        input.taxes = vec![InvoiceTaxInput {
            account_head: Some("VAT".to_string()),
            rate: Some(dec!(200)),
            ..Default::default()
        }];
        assert_eq!(
            InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known()).unwrap_err(),
            InvoiceError::AmountOverflow {
                field: "tax_amount",
                row: Some(1)
            }
        );
    }

    #[test]
    fn test_rebuild_from_stored_invoice() {
        let mut input = sales(vec![item("WIDGET", Some(dec!(3)), Some(dec!(9.99)))]);
        input.taxes = vec![
            InvoiceTaxInput {
                account_head: Some("VAT".to_string()),
                rate: Some(dec!(20)),
                ..Default::default()
            },
            InvoiceTaxInput {
                account_head: Some("VAT".to_string()),
                charge_type: Some(ChargeType::Actual),
                tax_amount: Some(dec!(1.5)),
                ..Default::default()
            },
        ];
        let invoice = InvoiceService::build(InvoiceKind::Sales, &input, &ctx(), &known())
            .unwrap()
            .document;

        let rebuilt =
            InvoiceService::build(InvoiceKind::Sales, &invoice.clone().into(), &ctx(), &known())
                .unwrap()
                .document;

        assert_eq!(rebuilt, invoice);
    }

    #[test]
    fn test_references() {
        let mut input = sales(vec![item("WIDGET", None, None), item("BOLT", None, None)]);
        input.company = Some("Acme".to_string());

        let refs = InvoiceService::references(InvoiceKind::Sales, &input);

        assert_eq!(refs.names(EntityKind::Customer), vec!["Jane"]);
        assert_eq!(refs.names(EntityKind::Item), vec!["BOLT", "WIDGET"]);
        assert_eq!(refs.names(EntityKind::Company), vec!["Acme"]);
    }
}

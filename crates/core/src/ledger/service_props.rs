//! Property-based tests for JournalService.
//!
//! - Property 1: Balanced entries are accepted with exact totals
//! - Property 2: Structural rejections (line count, line amounts)
//! - Property 3: Balance tolerance
//! - Property 4: Build is a pure function of its input

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::JournalError;
use super::service::JournalService;
use super::types::{JournalEntryInput, JournalLineInput};
use crate::context::BuildContext;
use crate::lookup::{EntityKind, EntityLookup, LookupError};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a list of positive amounts.
fn amounts(max: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_amount(), 1..=max)
}

/// Lookup where every company and account exists.
fn everything_exists(_: EntityKind, _: &str) -> Result<bool, LookupError> {
    Ok(true)
}

fn ctx() -> BuildContext {
    BuildContext::new(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
}

fn debit(account: &str, amount: Decimal) -> JournalLineInput {
    JournalLineInput {
        account: Some(account.to_string()),
        debit_amount: Some(amount),
        ..Default::default()
    }
}

fn credit(account: &str, amount: Decimal) -> JournalLineInput {
    JournalLineInput {
        account: Some(account.to_string()),
        credit_amount: Some(amount),
        ..Default::default()
    }
}

fn make_input(lines: Vec<JournalLineInput>) -> JournalEntryInput {
    JournalEntryInput {
        company: Some("Acme".to_string()),
        lines,
        ..Default::default()
    }
}

/// Debit lines for `debits` balanced by credit lines splitting the same total.
fn balanced_lines(debits: &[Decimal], credit_parts: usize) -> Vec<JournalLineInput> {
    let total: Decimal = debits.iter().copied().sum();
    let mut lines: Vec<_> = debits
        .iter()
        .enumerate()
        .map(|(i, amount)| debit(&format!("Expense {i}"), *amount))
        .collect();

    let parts = Decimal::from(credit_parts as u64);
    let share = (total / parts).round_dp(2);
    let mut remaining = total;
    for i in 0..credit_parts {
        let amount = if i + 1 == credit_parts { remaining } else { share };
        remaining -= amount;
        lines.push(credit(&format!("Liability {i}"), amount));
    }
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Balanced entries are accepted with exact totals
    // =========================================================================

    /// *For any* set of lines whose debits and credits sum to the same value,
    /// build SHALL succeed and report totals equal to the input sums.
    #[test]
    fn prop_balanced_entry_accepted(debits in amounts(5)) {
        let lines = balanced_lines(&debits, 1);
        let expected: Decimal = debits.iter().copied().sum();
        let count = lines.len();

        let result = JournalService::build(&make_input(lines), &ctx(), &everything_exists);

        prop_assert!(result.is_ok(), "Balanced entry should be accepted: {:?}", result);
        let entry = result.unwrap().document;
        prop_assert_eq!(entry.total_debit, expected);
        prop_assert_eq!(entry.total_credit, expected);
        prop_assert_eq!(entry.lines.len(), count);
    }

    /// *For any* balanced entry, lines keep their input order and numbering.
    #[test]
    fn prop_lines_keep_input_order(debits in amounts(4)) {
        let lines = balanced_lines(&debits, 1);
        let accounts: Vec<_> = lines.iter().map(|l| l.account.clone().unwrap()).collect();

        let entry = JournalService::build(&make_input(lines), &ctx(), &everything_exists)
            .unwrap()
            .document;

        for (i, line) in entry.lines.iter().enumerate() {
            prop_assert_eq!(&line.account, &accounts[i]);
            prop_assert_eq!(line.idx as usize, i + 1);
        }
    }

    // =========================================================================
    // Property 2: Structural rejections
    // =========================================================================

    /// *For any* single-line input, build SHALL fail with InsufficientLines.
    #[test]
    fn prop_single_line_rejected(amount in positive_amount()) {
        let result = JournalService::build(
            &make_input(vec![debit("Cash", amount)]),
            &ctx(),
            &everything_exists,
        );

        prop_assert_eq!(result.unwrap_err(), JournalError::InsufficientLines { count: 1 });
    }

    /// *For any* line with both a debit and a credit, build SHALL fail with
    /// AmbiguousLineAmount on that line.
    #[test]
    fn prop_both_sides_rejected(
        a in positive_amount(),
        b in positive_amount(),
        row in 0usize..3,
    ) {
        let mut lines = balanced_lines(&[a, a], 1);
        lines[row].debit_amount = Some(b);
        lines[row].credit_amount = Some(b);

        let result = JournalService::build(&make_input(lines), &ctx(), &everything_exists);

        let is_ambiguous = matches!(
            result,
            Err(JournalError::AmbiguousLineAmount { row: r, .. }) if r == row + 1
        );
        prop_assert!(is_ambiguous);
    }

    /// *For any* line with neither a debit nor a credit, build SHALL fail with
    /// EmptyLineAmount on that line.
    #[test]
    fn prop_empty_line_rejected(
        a in positive_amount(),
        explicit_zero in any::<bool>(),
    ) {
        let zero = explicit_zero.then_some(Decimal::ZERO);
        let lines = vec![
            debit("Cash", a),
            credit("Sales", a),
            JournalLineInput {
                account: Some("Suspense".to_string()),
                debit_amount: zero,
                credit_amount: zero,
                ..Default::default()
            },
        ];

        let result = JournalService::build(&make_input(lines), &ctx(), &everything_exists);

        let is_empty = matches!(result, Err(JournalError::EmptyLineAmount { row: 3, .. }));
        prop_assert!(is_empty);
    }

    // =========================================================================
    // Property 3: Balance tolerance
    // =========================================================================

    /// *For any* difference above 0.01, build SHALL fail with
    /// UnbalancedTransaction carrying both totals.
    #[test]
    fn prop_unbalanced_entry_rejected(
        amount in positive_amount(),
        excess_millis in 11i64..1_000_000i64,
    ) {
        let excess = Decimal::new(excess_millis, 3);
        let lines = vec![debit("Cash", amount + excess), credit("Sales", amount)];

        let result = JournalService::build(&make_input(lines), &ctx(), &everything_exists);

        prop_assert_eq!(
            result.unwrap_err(),
            JournalError::UnbalancedTransaction {
                total_debit: amount + excess,
                total_credit: amount,
            }
        );
    }

    /// *For any* difference of at most 0.01, build SHALL succeed.
    #[test]
    fn prop_within_tolerance_accepted(
        amount in positive_amount(),
        slack_millis in 0i64..=10i64,
        debit_heavy in any::<bool>(),
    ) {
        let slack = Decimal::new(slack_millis, 3);
        let lines = if debit_heavy {
            vec![debit("Cash", amount + slack), credit("Sales", amount)]
        } else {
            vec![debit("Cash", amount), credit("Sales", amount + slack)]
        };

        let result = JournalService::build(&make_input(lines), &ctx(), &everything_exists);

        prop_assert!(result.is_ok());
    }

    // =========================================================================
    // Property 4: Purity
    // =========================================================================

    /// *For any* input, two builds produce identical results.
    #[test]
    fn prop_build_is_idempotent(debits in amounts(4), credit_parts in 1usize..4) {
        let input = make_input(balanced_lines(&debits, credit_parts));

        let first = JournalService::build(&input, &ctx(), &everything_exists);
        let second = JournalService::build(&input, &ctx(), &everything_exists);

        prop_assert_eq!(first, second);
    }

    /// *For any* input referencing an unknown account, build SHALL name that
    /// account and row.
    #[test]
    fn prop_unknown_account_named(a in positive_amount(), row in 0usize..2) {
        let mut lines = vec![debit("Cash", a), credit("Sales", a)];
        lines[row].account = Some("Ghost".to_string());
        let lookup = |kind: EntityKind, name: &str| -> Result<bool, LookupError> {
            Ok(kind == EntityKind::Company || name != "Ghost")
        };

        let result = JournalService::build(&make_input(lines), &ctx(), &lookup);

        prop_assert_eq!(
            result.unwrap_err(),
            JournalError::UnknownEntity {
                kind: EntityKind::Account,
                name: "Ghost".to_string(),
                row: Some(row + 1),
            }
        );
        prop_assert!(lookup.exists(EntityKind::Account, "Cash").unwrap());
    }
}

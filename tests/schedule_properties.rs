use chrono::NaiveDate;
use credit_schedule::{
    apply_payment, build_schedule, validate_installments, validate_template, CreditSchedule,
    InstallmentTemplate, Money, PaymentTrace, Percentage, ScheduleRequest,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn issue_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn build(total: Money, templates: Vec<InstallmentTemplate>) -> CreditSchedule {
    build_schedule(&ScheduleRequest::new(total, issue_date()).with_templates(templates))
}

/// split 100% at the given cut points (in hundredths of a point)
fn templates_from_cuts(cuts: &BTreeSet<i64>, days: &[u32]) -> Vec<InstallmentTemplate> {
    let mut bounds: Vec<i64> = vec![0];
    bounds.extend(cuts.iter().copied());
    bounds.push(10_000);

    bounds
        .windows(2)
        .zip(days.iter())
        .map(|(pair, days)| {
            InstallmentTemplate::new(*days, Percentage::from_hundredths(pair[1] - pair[0]))
        })
        .collect()
}

proptest! {
    /// installments of a valid template sum exactly to the total
    #[test]
    fn prop_valid_template_sums_to_total(
        cents in 0i64..100_000_000,
        cuts in prop::collection::btree_set(1i64..10_000, 0..8),
        days in prop::collection::vec(0u32..720, 9),
    ) {
        let templates = templates_from_cuts(&cuts, &days);
        prop_assert!(validate_template(&templates).is_empty());

        let total = Money::from_cents(cents);
        let schedule = build(total, templates.clone());

        prop_assert_eq!(schedule.installments().len(), templates.len());
        prop_assert_eq!(schedule.total_amount(), total);
        prop_assert_eq!(schedule.total_percentage(), Percentage::ONE_HUNDRED);
    }

    /// the last installment absorbs the remainder even for a broken template
    #[test]
    fn prop_any_template_sums_to_total(
        cents in 0i64..100_000_000,
        entries in prop::collection::vec((0u32..720, -5_000i64..15_000), 1..10),
    ) {
        let templates: Vec<InstallmentTemplate> = entries
            .iter()
            .map(|(days, hundredths)| {
                InstallmentTemplate::new(*days, Percentage::from_hundredths(*hundredths))
            })
            .collect();

        let total = Money::from_cents(cents);
        let schedule = build(total, templates);

        prop_assert_eq!(schedule.total_amount(), total);
    }

    /// sequence numbers follow due dates and the global due date is the latest
    #[test]
    fn prop_due_dates_ordered(
        cuts in prop::collection::btree_set(1i64..10_000, 0..8),
        days in prop::collection::vec(0u32..3_650, 9),
    ) {
        let templates = templates_from_cuts(&cuts, &days);
        let schedule = build(Money::from_major(1_000), templates);
        let installments = schedule.installments();

        for (index, installment) in installments.iter().enumerate() {
            prop_assert_eq!(installment.sequence_number() as usize, index + 1);
            prop_assert!(installment.due_date().is_some());
        }
        for pair in installments.windows(2) {
            prop_assert!(pair[0].due_date() <= pair[1].due_date());
        }

        let latest = installments.iter().filter_map(|i| i.due_date()).max();
        prop_assert_eq!(Some(schedule.global_due_date()), latest);
        prop_assert!(validate_installments(installments).is_empty());
    }

    /// positive payments never move status backward or raise the balance
    #[test]
    fn prop_payments_are_monotonic(
        amount_cents in 1i64..10_000_000,
        payments in prop::collection::vec(1i64..5_000_000, 1..12),
    ) {
        let request = ScheduleRequest::new(Money::from_cents(amount_cents), issue_date());
        let schedule = build_schedule(&request);
        let mut installment = schedule.installments()[0].clone();

        for (count, cents) in payments.iter().enumerate() {
            let before_status = installment.status();
            let before_outstanding = installment.outstanding_amount();

            let trace = PaymentTrace::new(Money::from_cents(*cents), issue_date());
            installment = apply_payment(&installment, trace).unwrap();

            prop_assert!(installment.status() >= before_status);
            prop_assert!(installment.outstanding_amount() < before_outstanding);
            prop_assert_eq!(installment.payment_traces().len(), count + 1);
        }

        let paid: i64 = payments.iter().sum();
        prop_assert_eq!(installment.paid_amount(), Money::from_cents(paid));
        let overpaid = Money::from_cents((paid - amount_cents).max(0));
        prop_assert_eq!(installment.overpaid_amount(), overpaid);
    }
}

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::decimal::{Money, Percentage};
use crate::errors::{Result, ScheduleError};
use crate::ledger::{PaymentLedger, PaymentTrace};
use crate::naming::resolve_global_due_date;
use crate::template::{InstallmentTemplate, TemplateNormalizer};
use crate::types::InstallmentStatus;

/// one dated, amount-bearing portion of a credit sale
///
/// `sequence_number`, `due_date` and `amount` are fixed when the schedule is
/// built. Payments only change `paid_amount` and `payment_traces`; the
/// outstanding balance and status are always derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    sequence_number: u32,
    days_to_due: u32,
    percentage: Percentage,
    /// `None` when the day offset runs past the representable calendar
    due_date: Option<NaiveDate>,
    amount: Money,
    paid_amount: Money,
    payment_traces: Vec<PaymentTrace>,
}

impl Installment {
    pub(crate) fn new(
        sequence_number: u32,
        template: InstallmentTemplate,
        due_date: Option<NaiveDate>,
        amount: Money,
    ) -> Self {
        Self {
            sequence_number,
            days_to_due: template.days_to_due,
            percentage: template.percentage,
            due_date,
            amount,
            paid_amount: Money::ZERO,
            payment_traces: Vec::new(),
        }
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn days_to_due(&self) -> u32 {
        self.days_to_due
    }

    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn paid_amount(&self) -> Money {
        self.paid_amount
    }

    /// amount minus paid, negative when overpaid
    pub fn outstanding_amount(&self) -> Money {
        self.amount - self.paid_amount
    }

    /// paid beyond the installment amount
    pub fn overpaid_amount(&self) -> Money {
        (self.paid_amount - self.amount).max(Money::ZERO)
    }

    pub fn status(&self) -> InstallmentStatus {
        InstallmentStatus::from_balances(self.paid_amount, self.outstanding_amount())
    }

    pub fn is_settled(&self) -> bool {
        self.status().is_settled()
    }

    /// unsettled and past its due date on `as_of`
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        !self.is_settled() && self.due_date.map_or(false, |due| due < as_of)
    }

    /// payment events in the order they were applied
    pub fn payment_traces(&self) -> &[PaymentTrace] {
        &self.payment_traces
    }

    /// the template entry this installment was built from
    pub fn template(&self) -> InstallmentTemplate {
        InstallmentTemplate::new(self.days_to_due, self.percentage)
    }

    pub(crate) fn record_payment(&mut self, trace: PaymentTrace) {
        self.paid_amount += trace.amount;
        self.payment_traces.push(trace);
    }
}

/// concrete payment plan of one credit sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditSchedule {
    total: Money,
    issue_date: NaiveDate,
    installments: Vec<Installment>,
    /// sum of template percentages, kept as built even when it is not 100
    total_percentage: Percentage,
    global_due_date: NaiveDate,
}

impl CreditSchedule {
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    /// installments in ascending due date order
    pub fn installments(&self) -> &[Installment] {
        &self.installments
    }

    pub fn installment(&self, sequence_number: u32) -> Option<&Installment> {
        self.installments.iter().find(|i| i.sequence_number == sequence_number)
    }

    pub fn total_percentage(&self) -> Percentage {
        self.total_percentage
    }

    pub fn global_due_date(&self) -> NaiveDate {
        self.global_due_date
    }

    pub fn total_amount(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.installments.iter().map(|i| i.paid_amount).sum()
    }

    pub fn total_outstanding(&self) -> Money {
        self.installments.iter().map(|i| i.outstanding_amount()).sum()
    }

    pub fn is_settled(&self) -> bool {
        self.installments.iter().all(Installment::is_settled)
    }

    /// earliest installment still open
    pub fn next_pending(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| !i.is_settled())
    }

    pub fn overdue_as_of(&self, as_of: NaiveDate) -> Vec<&Installment> {
        self.installments.iter().filter(|i| i.is_overdue(as_of)).collect()
    }

    /// copy of this schedule with the installment of the same sequence number replaced
    pub fn with_installment(&self, installment: Installment) -> Result<CreditSchedule> {
        let sequence_number = installment.sequence_number;
        let position = self
            .installments
            .iter()
            .position(|i| i.sequence_number == sequence_number)
            .ok_or(ScheduleError::InstallmentNotFound { sequence_number })?;

        let mut updated = self.clone();
        updated.installments[position] = installment;
        Ok(updated)
    }

    /// apply a payment to one installment, returning the updated schedule
    pub fn apply_payment(
        &self,
        sequence_number: u32,
        trace: PaymentTrace,
    ) -> Result<CreditSchedule> {
        PaymentLedger::new().apply_to_schedule(self, sequence_number, trace)
    }
}

/// inputs for building a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub total: Money,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub templates: Option<Vec<InstallmentTemplate>>,
}

impl ScheduleRequest {
    pub fn new(total: Money, issue_date: NaiveDate) -> Self {
        Self {
            total,
            issue_date,
            templates: None,
        }
    }

    pub fn with_templates(mut self, templates: Vec<InstallmentTemplate>) -> Self {
        self.templates = Some(templates);
        self
    }
}

/// schedule builder
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    normalizer: TemplateNormalizer,
    percentage_tolerance: Decimal,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

impl ScheduleBuilder {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            normalizer: TemplateNormalizer::new(config),
            percentage_tolerance: config.percentage_tolerance,
        }
    }

    /// build a dated schedule whose amounts sum exactly to the total
    ///
    /// Templates are ordered by day offset (stable for ties). Every
    /// installment but the last gets its rounded percentage share; the last
    /// absorbs the remainder. The percentage sum is not enforced here, see
    /// [`crate::validation::ScheduleValidator`].
    pub fn build(&self, request: &ScheduleRequest) -> CreditSchedule {
        let total = if request.total.is_negative() {
            warn!(total = %request.total, "negative credit total, clamping to zero");
            Money::ZERO
        } else {
            request.total
        };

        let mut templates = self.normalizer.normalize_typed(request.templates.as_deref());
        templates.sort_by_key(|t| t.days_to_due);

        let last = templates.len().saturating_sub(1);
        let mut allocated = Money::ZERO;
        let mut installments = Vec::with_capacity(templates.len());

        for (index, template) in templates.iter().enumerate() {
            let amount = if index == last {
                total - allocated
            } else {
                let share = total.percentage(template.percentage);
                allocated += share;
                share
            };

            let due_date = request
                .issue_date
                .checked_add_days(Days::new(u64::from(template.days_to_due)));
            if due_date.is_none() {
                warn!(
                    days_to_due = template.days_to_due,
                    issue_date = %request.issue_date,
                    "due date out of calendar range"
                );
            }

            installments.push(Installment::new(index as u32 + 1, *template, due_date, amount));
        }

        let total_percentage = match templates
            .iter()
            .try_fold(Percentage::ZERO, |acc, t| acc.checked_add(t.percentage))
        {
            Some(sum) => sum,
            None => {
                let saturated: Percentage = templates.iter().map(|t| t.percentage).sum();
                warn!(
                    total_percentage = %saturated,
                    "template percentages overflow the decimal range, saturating"
                );
                saturated
            }
        };
        if total_percentage.deviation_from_full() > self.percentage_tolerance {
            warn!(
                total_percentage = %total_percentage,
                "building schedule from template that does not sum to 100%"
            );
        }

        let global_due_date = resolve_global_due_date(&installments).unwrap_or(request.issue_date);

        debug!(
            total = %total,
            issue_date = %request.issue_date,
            installments = installments.len(),
            total_percentage = %total_percentage,
            global_due_date = %global_due_date,
            "built credit schedule"
        );

        CreditSchedule {
            total,
            issue_date: request.issue_date,
            installments,
            total_percentage,
            global_due_date,
        }
    }
}

/// build a schedule with default configuration
pub fn build_schedule(request: &ScheduleRequest) -> CreditSchedule {
    ScheduleBuilder::default().build(request)
}

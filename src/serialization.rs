/// serialization support for schedules
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Percentage};
use crate::errors::Result;
use crate::ledger::PaymentTrace;
use crate::naming::display_name;
use crate::schedule::{CreditSchedule, Installment};
use crate::types::InstallmentStatus;

/// serializable view of an installment with derived fields filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentView {
    pub sequence_number: u32,
    pub days_to_due: u32,
    pub percentage: Percentage,
    pub due_date: Option<NaiveDate>,
    pub amount: Money,
    pub paid_amount: Money,
    pub outstanding_amount: Money,
    pub status: InstallmentStatus,
    pub payment_traces: Vec<PaymentTrace>,
}

impl InstallmentView {
    pub fn from_installment(installment: &Installment) -> Self {
        InstallmentView {
            sequence_number: installment.sequence_number(),
            days_to_due: installment.days_to_due(),
            percentage: installment.percentage(),
            due_date: installment.due_date(),
            amount: installment.amount(),
            paid_amount: installment.paid_amount(),
            outstanding_amount: installment.outstanding_amount(),
            status: installment.status(),
            payment_traces: installment.payment_traces().to_vec(),
        }
    }
}

/// serializable view of a schedule's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub display_name: String,
    pub total: Money,
    pub issue_date: NaiveDate,
    pub global_due_date: NaiveDate,
    pub total_percentage: Percentage,
    pub totals: TotalsView,
    pub installments: Vec<InstallmentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    pub amount: Money,
    pub paid: Money,
    pub outstanding: Money,
    pub settled: bool,
    pub next_pending: Option<u32>,
}

impl ScheduleView {
    pub fn from_schedule(schedule: &CreditSchedule) -> Self {
        let templates: Vec<_> = schedule.installments().iter().map(Installment::template).collect();

        ScheduleView {
            display_name: display_name(&templates),
            total: schedule.total(),
            issue_date: schedule.issue_date(),
            global_due_date: schedule.global_due_date(),
            total_percentage: schedule.total_percentage(),
            totals: TotalsView {
                amount: schedule.total_amount(),
                paid: schedule.total_paid(),
                outstanding: schedule.total_outstanding(),
                settled: schedule.is_settled(),
                next_pending: schedule.next_pending().map(Installment::sequence_number),
            },
            installments: schedule
                .installments()
                .iter()
                .map(InstallmentView::from_installment)
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl CreditSchedule {
    /// pretty-printed json view of the schedule
    pub fn json(&self) -> Result<String> {
        ScheduleView::from_schedule(self).to_json_pretty()
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{Result, ScheduleError};
use crate::schedule::{CreditSchedule, Installment};
use crate::types::TraceId;

/// one payment event applied to an installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTrace {
    pub id: TraceId,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl PaymentTrace {
    /// new trace with a fresh id
    pub fn new(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            method: None,
            reference: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// payment ledger
///
/// Works on copies: the installment passed in is never touched, and the
/// caller swaps the returned value into its schedule. Two payments against
/// the same installment must be serialized by the caller.
#[derive(Debug, Clone, Default)]
pub struct PaymentLedger;

impl PaymentLedger {
    pub fn new() -> Self {
        Self
    }

    /// apply a payment and return the updated installment
    pub fn apply_payment(
        &self,
        installment: &Installment,
        trace: PaymentTrace,
    ) -> Result<Installment> {
        if !trace.amount.is_positive() {
            warn!(
                sequence_number = installment.sequence_number(),
                amount = %trace.amount,
                "rejected non-positive payment"
            );
            return Err(ScheduleError::InvalidPaymentAmount {
                amount: trace.amount,
            });
        }

        let previous_status = installment.status();
        if previous_status.is_settled() {
            warn!(
                sequence_number = installment.sequence_number(),
                amount = %trace.amount,
                "payment applied to settled installment"
            );
        }

        let trace_id = trace.id;
        let amount = trace.amount;
        let mut updated = installment.clone();
        updated.record_payment(trace);

        debug!(
            sequence_number = updated.sequence_number(),
            trace_id = %trace_id,
            amount = %amount,
            outstanding = %updated.outstanding_amount(),
            from = %previous_status,
            to = %updated.status(),
            "payment applied"
        );

        Ok(updated)
    }

    /// apply a payment to one installment of a schedule
    pub fn apply_to_schedule(
        &self,
        schedule: &CreditSchedule,
        sequence_number: u32,
        trace: PaymentTrace,
    ) -> Result<CreditSchedule> {
        let installment = schedule
            .installment(sequence_number)
            .ok_or(ScheduleError::InstallmentNotFound { sequence_number })?;

        let updated = self.apply_payment(installment, trace)?;
        schedule.with_installment(updated)
    }
}

/// apply a payment with the default ledger
pub fn apply_payment(installment: &Installment, trace: PaymentTrace) -> Result<Installment> {
    PaymentLedger::new().apply_payment(installment, trace)
}

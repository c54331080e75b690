//! Advisory checks for installment plans and built schedules.
//!
//! Nothing here rejects anything on its own: callers receive a list of
//! messages and decide whether to block a save or an issuance. An empty
//! list means the input passed every rule.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::SchedulerConfig;
use crate::schedule::Installment;
use crate::template::{InstallmentTemplate, RawInstallmentTemplate};

/// a broken validation rule
///
/// Per-entry rules report every offending position (1-based) in a single
/// violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    #[error("Agrega al menos una cuota.")]
    NoInstallments,

    #[error("La suma de los porcentajes debe ser 100% (actual: {total}%).")]
    PercentageSum { total: Decimal },

    #[error(
        "Los días de vencimiento no pueden ser negativos (cuotas {}).",
        join_positions(.positions)
    )]
    NegativeDays { positions: Vec<usize> },

    #[error(
        "Cada cuota debe tener un porcentaje mayor a 0 (cuotas {}).",
        join_positions(.positions)
    )]
    NonPositivePercentage { positions: Vec<usize> },

    #[error(
        "Cada cuota debe tener un monto mayor a 0 (cuotas {}).",
        join_positions(.positions)
    )]
    NonPositiveAmount { positions: Vec<usize> },

    #[error(
        "Cada cuota debe tener una fecha de vencimiento válida (cuotas {}).",
        join_positions(.positions)
    )]
    MissingDueDate { positions: Vec<usize> },
}

fn join_positions(positions: &[usize]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// the fields the shared plan rules look at
struct PlanEntry {
    position: usize,
    days_to_due: i64,
    percentage: Decimal,
}

/// schedule validator
#[derive(Debug, Clone)]
pub struct ScheduleValidator {
    percentage_tolerance: Decimal,
}

impl Default for ScheduleValidator {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

impl ScheduleValidator {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            percentage_tolerance: config.percentage_tolerance,
        }
    }

    pub fn template_violations(&self, templates: &[InstallmentTemplate]) -> Vec<ScheduleViolation> {
        let entries: Vec<PlanEntry> = templates
            .iter()
            .enumerate()
            .map(|(index, t)| PlanEntry {
                position: index + 1,
                days_to_due: i64::from(t.days_to_due),
                percentage: t.percentage.as_decimal(),
            })
            .collect();

        self.plan_violations(&entries)
    }

    /// check raw entries before normalization clamps them
    pub fn raw_template_violations(
        &self,
        templates: &[RawInstallmentTemplate],
    ) -> Vec<ScheduleViolation> {
        let entries: Vec<PlanEntry> = templates
            .iter()
            .enumerate()
            .map(|(index, t)| PlanEntry {
                position: index + 1,
                days_to_due: t.days_value().unwrap_or(0),
                percentage: t.percentage_value().unwrap_or(Decimal::ZERO),
            })
            .collect();

        self.plan_violations(&entries)
    }

    pub fn installment_violations(&self, installments: &[Installment]) -> Vec<ScheduleViolation> {
        let entries: Vec<PlanEntry> = installments
            .iter()
            .map(|i| PlanEntry {
                position: i.sequence_number() as usize,
                days_to_due: i64::from(i.days_to_due()),
                percentage: i.percentage().as_decimal(),
            })
            .collect();

        let mut violations = self.plan_violations(&entries);
        if installments.is_empty() {
            return violations;
        }

        let non_positive: Vec<usize> = installments
            .iter()
            .filter(|i| !i.amount().is_positive())
            .map(|i| i.sequence_number() as usize)
            .collect();
        if !non_positive.is_empty() {
            violations.push(ScheduleViolation::NonPositiveAmount { positions: non_positive });
        }

        let unresolved: Vec<usize> = installments
            .iter()
            .filter(|i| i.due_date().is_none())
            .map(|i| i.sequence_number() as usize)
            .collect();
        if !unresolved.is_empty() {
            violations.push(ScheduleViolation::MissingDueDate { positions: unresolved });
        }

        violations
    }

    pub fn validate_template(&self, templates: &[InstallmentTemplate]) -> Vec<String> {
        messages(self.template_violations(templates))
    }

    pub fn validate_raw_template(&self, templates: &[RawInstallmentTemplate]) -> Vec<String> {
        messages(self.raw_template_violations(templates))
    }

    pub fn validate_installments(&self, installments: &[Installment]) -> Vec<String> {
        messages(self.installment_violations(installments))
    }

    fn plan_violations(&self, entries: &[PlanEntry]) -> Vec<ScheduleViolation> {
        if entries.is_empty() {
            return vec![ScheduleViolation::NoInstallments];
        }

        let mut violations = Vec::new();

        // saturates at the decimal range
        let total = entries
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.percentage));
        if total.saturating_sub(Decimal::ONE_HUNDRED).abs() > self.percentage_tolerance {
            violations.push(ScheduleViolation::PercentageSum {
                total: total.normalize(),
            });
        }

        let negative_days: Vec<usize> = entries
            .iter()
            .filter(|e| e.days_to_due < 0)
            .map(|e| e.position)
            .collect();
        if !negative_days.is_empty() {
            violations.push(ScheduleViolation::NegativeDays { positions: negative_days });
        }

        let non_positive: Vec<usize> = entries
            .iter()
            .filter(|e| e.percentage <= Decimal::ZERO)
            .map(|e| e.position)
            .collect();
        if !non_positive.is_empty() {
            violations.push(ScheduleViolation::NonPositivePercentage { positions: non_positive });
        }

        violations
    }
}

fn messages(violations: Vec<ScheduleViolation>) -> Vec<String> {
    violations.into_iter().map(|v| v.to_string()).collect()
}

/// validate a template with default configuration
pub fn validate_template(templates: &[InstallmentTemplate]) -> Vec<String> {
    ScheduleValidator::default().validate_template(templates)
}

/// validate built installments with default configuration
pub fn validate_installments(installments: &[Installment]) -> Vec<String> {
    ScheduleValidator::default().validate_installments(installments)
}

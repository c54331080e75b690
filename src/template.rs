use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::decimal::Percentage;
use crate::errors::Result;

/// one entry of an installment plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentTemplate {
    pub days_to_due: u32,
    pub percentage: Percentage,
}

impl InstallmentTemplate {
    pub fn new(days_to_due: u32, percentage: Percentage) -> Self {
        Self {
            days_to_due,
            percentage,
        }
    }
}

/// plan entry as received from configuration forms or legacy records
///
/// Fields hold whatever the caller sent: numbers, numeric strings,
/// null, or garbage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstallmentTemplate {
    #[serde(default)]
    pub days_to_due: Value,
    #[serde(default)]
    pub percentage: Value,
}

impl RawInstallmentTemplate {
    pub fn new(days_to_due: impl Into<Value>, percentage: impl Into<Value>) -> Self {
        Self {
            days_to_due: days_to_due.into(),
            percentage: percentage.into(),
        }
    }

    /// day offset truncated toward zero, not clamped
    pub(crate) fn days_value(&self) -> Option<i64> {
        coerce_number(&self.days_to_due).map(truncate_days)
    }

    pub(crate) fn percentage_value(&self) -> Option<Decimal> {
        coerce_number(&self.percentage)
    }
}

impl From<InstallmentTemplate> for RawInstallmentTemplate {
    fn from(template: InstallmentTemplate) -> Self {
        Self {
            days_to_due: Value::from(template.days_to_due),
            percentage: Value::String(template.percentage.as_decimal().to_string()),
        }
    }
}

/// parse a json array of raw plan entries
pub fn parse_raw_templates(json: &str) -> Result<Vec<RawInstallmentTemplate>> {
    Ok(serde_json::from_str(json)?)
}

/// template normalizer
#[derive(Debug, Clone)]
pub struct TemplateNormalizer {
    default_template: InstallmentTemplate,
}

impl Default for TemplateNormalizer {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

impl TemplateNormalizer {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            default_template: InstallmentTemplate::new(
                config.default_template.days_to_due,
                config.default_template.percentage,
            ),
        }
    }

    /// fallback plan used for empty input
    pub fn default_template(&self) -> InstallmentTemplate {
        self.default_template
    }

    /// sanitize raw entries into a well-formed template, preserving order
    pub fn normalize(&self, raw: Option<&[RawInstallmentTemplate]>) -> Vec<InstallmentTemplate> {
        match raw {
            Some(entries) if !entries.is_empty() => {
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| normalize_entry(index, entry))
                    .collect()
            }
            _ => vec![self.default_template],
        }
    }

    /// apply the empty-input fallback to already typed entries
    pub fn normalize_typed(
        &self,
        templates: Option<&[InstallmentTemplate]>,
    ) -> Vec<InstallmentTemplate> {
        match templates {
            Some(entries) if !entries.is_empty() => entries.to_vec(),
            _ => vec![self.default_template],
        }
    }
}

/// normalize with default configuration
pub fn normalize_templates(raw: Option<&[RawInstallmentTemplate]>) -> Vec<InstallmentTemplate> {
    TemplateNormalizer::default().normalize(raw)
}

fn normalize_entry(index: usize, entry: &RawInstallmentTemplate) -> InstallmentTemplate {
    let days_to_due = match entry.days_value() {
        Some(days) => clamp_days(days),
        None => {
            debug!(index, value = %entry.days_to_due, "non-numeric days to due, using 0");
            0
        }
    };

    let percentage = match entry.percentage_value() {
        Some(value) => Percentage::from_decimal(value),
        None => {
            debug!(index, value = %entry.percentage, "non-numeric percentage, using 0");
            Percentage::ZERO
        }
    };

    InstallmentTemplate::new(days_to_due, percentage)
}

/// read a loosely typed json value as a number
///
/// Returns `None` for null, objects, arrays, unparsable strings and values
/// outside the decimal range. Blank strings read as zero.
pub(crate) fn coerce_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => parse_numeric_str(s),
        Value::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
        _ => None,
    }
}

fn parse_numeric_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return Some(Decimal::ZERO);
    }

    Decimal::from_str(s).ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(Decimal::from_f64)
    })
}

fn truncate_days(value: Decimal) -> i64 {
    let truncated = value.trunc();
    truncated.to_i64().unwrap_or(if truncated.is_sign_negative() { i64::MIN } else { i64::MAX })
}

fn clamp_days(days: i64) -> u32 {
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

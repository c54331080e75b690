use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Percentage;
use crate::errors::{Result, ScheduleError};

/// scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// allowed distance of a template's percentage sum from 100
    pub percentage_tolerance: Decimal,
    /// template used when none is supplied
    pub default_template: DefaultTemplate,
    /// wording for payment method names
    pub labels: NamingLabels,
}

/// single-installment fallback plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultTemplate {
    pub days_to_due: u32,
    pub percentage: Percentage,
}

/// display wording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingLabels {
    /// leading word, also the name used when no day offsets exist
    pub prefix: String,
    /// trailing unit after the day list
    pub unit: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            percentage_tolerance: dec!(0.01),
            default_template: DefaultTemplate::default(),
            labels: NamingLabels::default(),
        }
    }
}

impl Default for DefaultTemplate {
    fn default() -> Self {
        Self {
            days_to_due: 30,
            percentage: Percentage::ONE_HUNDRED,
        }
    }
}

impl Default for NamingLabels {
    fn default() -> Self {
        Self {
            prefix: "Crédito".to_string(),
            unit: "días".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// create configuration whose fallback plan is a single payment due after `days`
    pub fn net_days(days: u32) -> Self {
        Self {
            default_template: DefaultTemplate {
                days_to_due: days,
                percentage: Percentage::ONE_HUNDRED,
            },
            ..Self::default()
        }
    }

    /// replace the naming labels
    pub fn with_labels(mut self, prefix: impl Into<String>, unit: impl Into<String>) -> Self {
        self.labels = NamingLabels {
            prefix: prefix.into(),
            unit: unit.into(),
        };
        self
    }

    /// load configuration from json, missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SchedulerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.percentage_tolerance < Decimal::ZERO {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!(
                    "percentage tolerance must not be negative, got {}",
                    self.percentage_tolerance
                ),
            });
        }

        let percentage = self.default_template.percentage;
        if !percentage.is_positive() || percentage > Percentage::ONE_HUNDRED {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!("default percentage must be in (0, 100], got {}", percentage),
            });
        }

        if self.labels.prefix.trim().is_empty() {
            return Err(ScheduleError::InvalidConfiguration {
                message: "naming prefix must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.percentage_tolerance, dec!(0.01));
        assert_eq!(config.default_template.days_to_due, 30);
        assert_eq!(config.default_template.percentage, Percentage::ONE_HUNDRED);
        assert_eq!(config.labels.prefix, "Crédito");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_net_days_preset() {
        let config = SchedulerConfig::net_days(15).with_labels("Credit", "days");
        assert_eq!(config.default_template.days_to_due, 15);
        assert_eq!(config.labels.unit, "days");
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SchedulerConfig::from_json_str(
            r#"{ "default_template": { "days_to_due": 45, "percentage": "100" } }"#,
        )
        .unwrap();

        assert_eq!(config.default_template.days_to_due, 45);
        assert_eq!(config.percentage_tolerance, dec!(0.01));
        assert_eq!(config.labels, NamingLabels::default());
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let result = SchedulerConfig::from_json_str(r#"{ "percentage_tolerance": "-1" }"#);
        assert!(matches!(result, Err(ScheduleError::InvalidConfiguration { .. })));

        let result = SchedulerConfig::from_json_str(
            r#"{ "default_template": { "days_to_due": 30, "percentage": "150" } }"#,
        );
        assert!(matches!(result, Err(ScheduleError::InvalidConfiguration { .. })));

        let result = SchedulerConfig::from_json_str("not json");
        assert!(matches!(result, Err(ScheduleError::Serialization(_))));
    }
}

use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use std::collections::BTreeSet;

use crate::config::{NamingLabels, SchedulerConfig};
use crate::schedule::Installment;
use crate::template::{InstallmentTemplate, RawInstallmentTemplate};

/// latest resolvable due date, `None` if there is none
pub fn resolve_global_due_date(installments: &[Installment]) -> Option<NaiveDate> {
    installments.iter().filter_map(Installment::due_date).max()
}

/// latest due date, or today's date from `time_provider` for an empty list
pub fn global_due_date(
    installments: &[Installment],
    time_provider: &SafeTimeProvider,
) -> NaiveDate {
    resolve_global_due_date(installments).unwrap_or_else(|| time_provider.now().date_naive())
}

/// latest due date, falling back to system time
pub fn global_due_date_now(installments: &[Installment]) -> NaiveDate {
    let time = SafeTimeProvider::new(TimeSource::System);
    global_due_date(installments, &time)
}

/// ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// builds payment method names from day offsets
#[derive(Debug, Clone)]
pub struct NamingHelper {
    labels: NamingLabels,
}

impl Default for NamingHelper {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default())
    }
}

impl NamingHelper {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            labels: config.labels.clone(),
        }
    }

    /// e.g. "Crédito 15-30 días"
    pub fn display_name(&self, templates: &[InstallmentTemplate]) -> String {
        let days: BTreeSet<i64> = templates.iter().map(|t| i64::from(t.days_to_due)).collect();
        self.render(&days)
    }

    /// same as [`NamingHelper::display_name`], skipping non-numeric and negative offsets
    pub fn display_name_raw(&self, templates: &[RawInstallmentTemplate]) -> String {
        let days: BTreeSet<i64> = templates
            .iter()
            .filter_map(RawInstallmentTemplate::days_value)
            .filter(|d| *d >= 0)
            .collect();
        self.render(&days)
    }

    fn render(&self, days: &BTreeSet<i64>) -> String {
        if days.is_empty() {
            return self.labels.prefix.clone();
        }

        let list = days.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("-");
        format!("{} {} {}", self.labels.prefix, list, self.labels.unit)
    }
}

/// display name with default labels
pub fn display_name(templates: &[InstallmentTemplate]) -> String {
    NamingHelper::default().display_name(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Percentage};
    use crate::schedule::{build_schedule, ScheduleRequest};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn template(days: u32, points: u32) -> InstallmentTemplate {
        InstallmentTemplate::new(days, Percentage::from_points(points))
    }

    #[test]
    fn test_single_offset_name() {
        assert_eq!(display_name(&[template(30, 100)]), "Crédito 30 días");
    }

    #[test]
    fn test_multiple_offsets_sorted() {
        assert_eq!(display_name(&[template(15, 50), template(30, 50)]), "Crédito 15-30 días");
        assert_eq!(
            display_name(&[template(90, 40), template(0, 20), template(45, 40)]),
            "Crédito 0-45-90 días"
        );
    }

    #[test]
    fn test_duplicate_offsets_collapsed() {
        assert_eq!(display_name(&[template(30, 50), template(30, 50)]), "Crédito 30 días");
    }

    #[test]
    fn test_empty_falls_back_to_prefix() {
        assert_eq!(display_name(&[]), "Crédito");
    }

    #[test]
    fn test_raw_offsets_filtered() {
        let helper = NamingHelper::default();
        let raw = vec![
            RawInstallmentTemplate::new(-10, 50),
            RawInstallmentTemplate::new("abc", 50),
            RawInstallmentTemplate::new(json!(30.7), 50),
            RawInstallmentTemplate::new("60", 50),
        ];
        assert_eq!(helper.display_name_raw(&raw), "Crédito 30-60 días");

        let garbage = vec![RawInstallmentTemplate::new(json!(null), 100)];
        assert_eq!(helper.display_name_raw(&garbage), "Crédito");
    }

    #[test]
    fn test_custom_labels() {
        let helper = NamingHelper::new(&SchedulerConfig::default().with_labels("Credit", "days"));
        assert_eq!(helper.display_name(&[template(15, 50), template(45, 50)]), "Credit 15-45 days");
    }

    #[test]
    fn test_global_due_date_is_latest() {
        let issue = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let schedule = build_schedule(
            &ScheduleRequest::new(Money::from_major(100), issue)
                .with_templates(vec![template(90, 30), template(10, 70)]),
        );

        let now = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(now));
        let latest = global_due_date(schedule.installments(), &time);

        assert_eq!(latest, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(to_iso_date(latest), "2025-04-01");
    }

    #[test]
    fn test_global_due_date_empty_uses_today() {
        let now = Utc.with_ymd_and_hms(2025, 7, 4, 23, 0, 0).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(now));

        assert_eq!(global_due_date(&[], &time), NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        assert_eq!(resolve_global_due_date(&[]), None);
    }
}

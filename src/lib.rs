pub mod config;
pub mod decimal;
pub mod errors;
pub mod ledger;
pub mod naming;
pub mod schedule;
pub mod serialization;
pub mod template;
pub mod types;
pub mod validation;

// re-export key types
pub use config::{DefaultTemplate, NamingLabels, SchedulerConfig};
pub use decimal::{Money, Percentage};
pub use errors::{Result, ScheduleError};
pub use ledger::{apply_payment, PaymentLedger, PaymentTrace};
pub use naming::{display_name, global_due_date, global_due_date_now, to_iso_date, NamingHelper};
pub use schedule::{build_schedule, CreditSchedule, Installment, ScheduleBuilder, ScheduleRequest};
pub use serialization::{InstallmentView, ScheduleView};
pub use template::{
    normalize_templates, parse_raw_templates, InstallmentTemplate, RawInstallmentTemplate,
    TemplateNormalizer,
};
pub use types::{InstallmentStatus, TraceId, SETTLEMENT_EPSILON};
pub use validation::{
    validate_installments, validate_template, ScheduleValidator, ScheduleViolation,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

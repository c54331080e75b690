use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("installment not found: {sequence_number}")]
    InstallmentNotFound {
        sequence_number: u32,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

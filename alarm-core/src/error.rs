//! Error types for alarm configuration

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlarmError {
    #[error("invalid alarm time {input:?}, expected HH:MM")]
    InvalidTimeFormat { input: String },
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

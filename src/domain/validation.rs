use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidSid { field: &'static str, prefix: &'static str },
    TooLong { field: &'static str, max: usize, actual: usize },
    PauseOutOfRange { min: u16, max: u16, actual: u16 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidSid { field, prefix } => {
                write!(f, "{field} must start with {prefix}")
            }
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::PauseOutOfRange { min, max, actual } => {
                write!(
                    f,
                    "pause length out of range: {actual} (expected {min}..={max})"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

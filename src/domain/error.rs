use derive_more::Display;

/// Validation failures raised while building domain values.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[display(fmt = "Email cannot be empty")]
    EmptyEmail,
    #[display(fmt = "Invalid email format: {}", _0)]
    InvalidEmail(String),
    #[display(fmt = "Invalid {} ID: {}", kind, value)]
    InvalidId { kind: &'static str, value: String },
    #[display(fmt = "Username must be between {} and {} characters", min, max)]
    UsernameLength { min: usize, max: usize },
    #[display(fmt = "Password must be at least {} characters", min)]
    PasswordTooShort { min: usize },
    #[display(fmt = "Phone number must be in format: 000-0000-0000")]
    InvalidPhoneNumber,
    #[display(fmt = "Zip code must be in format: 000-0000")]
    InvalidZipCode,
    #[display(fmt = "Clock-in time must be before rest-in time")]
    ClockInAfterRestIn,
    #[display(fmt = "Rest-in time must be before rest-out time")]
    RestInAfterRestOut,
    #[display(fmt = "Rest-out time must be before clock-out time")]
    RestOutAfterClockOut,
    #[display(fmt = "Transportation expenses must not be negative")]
    NegativeExpenses,
    #[display(fmt = "Unknown {}: {}", kind, value)]
    UnknownVariant { kind: &'static str, value: String },
}

impl std::error::Error for DomainError {}

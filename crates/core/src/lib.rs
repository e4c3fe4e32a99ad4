//! Core types for the ADR predictor: booking records, categorical labels and input rows.

pub mod artifact;
pub mod booking;
pub mod labels;
pub mod row;

pub use artifact::ArtifactError;
pub use booking::BookingRecord;
pub use labels::{
    CustomerType, DepositType, DistributionChannel, HotelType, MarketSegment, MealPlan, RoomType,
    Weekday,
};
pub use row::{Cell, FeatureRow};

/// Average daily rate, in the currency the model was trained on.
pub type Price = f64;

/// Malformed user input. Recovered at the boundary; no computation is attempted.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("country code must be exactly 3 letters, got {0:?}")]
    Country(String),
    #[error("at least one guest (adult, child or baby) is required")]
    NoOccupants,
    #[error("arrival month must be between 1 and 12, got {0}")]
    Month(u8),
    #[error("arrival day {day} does not exist in month {month}")]
    Day { month: u8, day: u8 },
    #[error("room type {value} is not allowed for {field}")]
    RoomType { field: &'static str, value: RoomType },
    #[error("unknown {field} {value:?}")]
    UnknownLabel { field: &'static str, value: String },
    #[error("malformed booking record: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// The input field the error refers to, when there is exactly one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Country(_) => Some("country"),
            ValidationError::NoOccupants => None,
            ValidationError::Month(_) => Some("arrival_date_month"),
            ValidationError::Day { .. } => Some("arrival_date_day_of_month"),
            ValidationError::RoomType { field, .. } => Some(*field),
            ValidationError::UnknownLabel { field, .. } => Some(*field),
            ValidationError::Malformed(_) => None,
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Malformed(err.to_string())
    }
}

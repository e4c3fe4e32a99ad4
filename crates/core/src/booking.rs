use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::labels::{
    CustomerType, DepositType, DistributionChannel, HotelType, MarketSegment, MealPlan, RoomType,
    Weekday,
};
use crate::ValidationError;

/// A single booking as entered on the prediction form.
///
/// Field names follow the columns of the hotel booking dataset. Flags accept
/// either JSON booleans or 0/1 integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BookingRecord {
    pub hotel: HotelType,
    #[serde(deserialize_with = "flag")]
    pub is_canceled: bool,
    pub lead_time: u32,
    pub arrival_date_month: u8,
    pub arrival_date_day_of_month: u8,
    pub arrival_day_of_week: Weekday,
    pub stays_in_weekend_nights: u32,
    pub stays_in_week_nights: u32,
    pub adults: u32,
    pub children: u32,
    pub babies: u32,
    #[serde(deserialize_with = "flag")]
    pub is_repeated_guest: bool,
    pub previous_cancellations: u32,
    pub previous_bookings_not_canceled: u32,
    pub country: String,
    pub market_segment: MarketSegment,
    pub distribution_channel: DistributionChannel,
    pub deposit_type: DepositType,
    pub customer_type: CustomerType,
    pub meal: MealPlan,
    pub reserved_room_type: RoomType,
    pub assigned_room_type: RoomType,
    pub booking_changes: u32,
    pub agent: u32,
    pub days_in_waiting_list: u32,
    #[serde(deserialize_with = "flag")]
    pub required_car_parking_spaces: bool,
    pub total_of_special_requests: u32,
}

impl Default for BookingRecord {
    /// The values the booking form starts out with.
    fn default() -> Self {
        Self {
            hotel: HotelType::City,
            is_canceled: false,
            lead_time: 30,
            arrival_date_month: 1,
            arrival_date_day_of_month: 15,
            arrival_day_of_week: Weekday::Monday,
            stays_in_weekend_nights: 1,
            stays_in_week_nights: 2,
            adults: 2,
            children: 0,
            babies: 0,
            is_repeated_guest: false,
            previous_cancellations: 0,
            previous_bookings_not_canceled: 0,
            country: String::from("IDN"),
            market_segment: MarketSegment::OnlineTa,
            distribution_channel: DistributionChannel::TaTo,
            deposit_type: DepositType::NoDeposit,
            customer_type: CustomerType::Transient,
            meal: MealPlan::BedAndBreakfast,
            reserved_room_type: RoomType::A,
            assigned_room_type: RoomType::A,
            booking_changes: 0,
            agent: 0,
            days_in_waiting_list: 0,
            required_car_parking_spaces: false,
            total_of_special_requests: 0,
        }
    }
}

impl BookingRecord {
    /// Parse a flat field → value mapping, normalise it and validate it.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let mut record = Self::deserialize(value)?;
        record.country = record.country.to_ascii_uppercase();
        record.validate()?;
        Ok(record)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    pub fn occupants(&self) -> u32 {
        self.adults
            .saturating_add(self.children)
            .saturating_add(self.babies)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let country = self.country.as_str();
        if country.len() != 3 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::Country(self.country.clone()));
        }
        if self.occupants() == 0 {
            return Err(ValidationError::NoOccupants);
        }
        let month = self.arrival_date_month;
        let max_day = days_in_month(month).ok_or(ValidationError::Month(month))?;
        let day = self.arrival_date_day_of_month;
        if day == 0 || day > max_day {
            return Err(ValidationError::Day { month, day });
        }
        if !self.reserved_room_type.reservable() {
            return Err(ValidationError::RoomType {
                field: "reserved_room_type",
                value: self.reserved_room_type,
            });
        }
        Ok(())
    }
}

// Year-agnostic, so 29 February is always accepted.
fn days_in_month(month: u8) -> Option<u8> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => Some(29),
        _ => None,
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u8),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "expected a flag (0 or 1), got {other}"
        ))),
    }
}

//! Untyped, column-ordered view of a booking used while building features.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::booking::BookingRecord;
use crate::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Number(_) => None,
            Cell::Text(s) => Some(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<u8> for Cell {
    fn from(value: u8) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Number(if value { 1.0 } else { 0.0 })
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// A single row of named cells. Insertion order is kept; inserting an
/// existing column overwrites it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    cells: Vec<(String, Cell)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from a flat JSON object. Booleans become 0/1, strings stay text.
    pub fn from_json_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut row = Self::new();
        for (name, value) in object {
            let cell = match value {
                Value::Bool(b) => Cell::from(*b),
                Value::Number(n) => n.as_f64().map(Cell::Number).ok_or_else(|| {
                    ValidationError::Malformed(format!("{name}: {n} is not representable"))
                })?,
                Value::String(s) => Cell::Text(s.clone()),
                other => {
                    return Err(ValidationError::Malformed(format!(
                        "{name}: expected a scalar, got {other}"
                    )))
                }
            };
            row.insert(name.clone(), cell);
        }
        Ok(row)
    }

    pub fn insert(&mut self, name: impl Into<String>, cell: impl Into<Cell>) {
        let name = name.into();
        let cell = cell.into();
        match self.position(&name) {
            Some(idx) => self.cells[idx].1 = cell,
            None => self.cells.push((name, cell)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Cell> {
        let idx = self.position(name)?;
        Some(self.cells.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.position(name).map(|idx| &self.cells[idx].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.cells.iter().position(|(n, _)| n == name)
    }
}

impl From<&BookingRecord> for FeatureRow {
    fn from(r: &BookingRecord) -> Self {
        let mut row = FeatureRow::new();
        row.insert("hotel", r.hotel.label());
        row.insert("is_canceled", r.is_canceled);
        row.insert("lead_time", r.lead_time);
        row.insert("arrival_date_month", r.arrival_date_month);
        row.insert("arrival_date_day_of_month", r.arrival_date_day_of_month);
        row.insert("stays_in_weekend_nights", r.stays_in_weekend_nights);
        row.insert("stays_in_week_nights", r.stays_in_week_nights);
        row.insert("adults", r.adults);
        row.insert("children", r.children);
        row.insert("babies", r.babies);
        row.insert("country", Cell::Text(r.country.to_ascii_uppercase()));
        row.insert("market_segment", r.market_segment.label());
        row.insert("is_repeated_guest", r.is_repeated_guest);
        row.insert("previous_cancellations", r.previous_cancellations);
        row.insert("previous_bookings_not_canceled", r.previous_bookings_not_canceled);
        row.insert("reserved_room_type", r.reserved_room_type.label());
        row.insert("assigned_room_type", r.assigned_room_type.label());
        row.insert("booking_changes", r.booking_changes);
        row.insert("agent", r.agent);
        row.insert("days_in_waiting_list", r.days_in_waiting_list);
        row.insert("distribution_channel", r.distribution_channel.label());
        row.insert("deposit_type", r.deposit_type.label());
        row.insert("customer_type", r.customer_type.label());
        row.insert("arrival_day_of_week", r.arrival_day_of_week.label());
        row.insert("meal", r.meal.label());
        row.insert("required_car_parking_spaces", r.required_car_parking_spaces);
        row.insert("total_of_special_requests", r.total_of_special_requests);
        // training data carries the month twice under two names
        row.insert("arrival_month", r.arrival_date_month);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_overwrites_in_place() {
        let mut row = FeatureRow::new();
        row.insert("a", 1.0);
        row.insert("b", "x");
        row.insert("a", 2.0);
        assert_eq!(row.len(), 2);
        assert_eq!(row.column_names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(row.get("a"), Some(&Cell::Number(2.0)));
    }

    #[test]
    fn remove_drops_the_column() {
        let mut row = FeatureRow::new();
        row.insert("meal", "BB");
        assert_eq!(row.remove("meal"), Some(Cell::Text("BB".into())));
        assert!(!row.contains("meal"));
        assert_eq!(row.remove("meal"), None);
    }

    #[test]
    fn booking_record_flattens_to_dataset_columns() {
        let row = FeatureRow::from(&BookingRecord::default());
        assert_eq!(row.len(), 28);
        assert_eq!(row.get("hotel").and_then(Cell::as_text), Some("City Hotel"));
        assert_eq!(row.get("is_canceled").and_then(Cell::as_number), Some(0.0));
        assert_eq!(row.get("arrival_month"), row.get("arrival_date_month"));
        assert_eq!(row.get("arrival_day_of_week").and_then(Cell::as_text), Some("Monday"));
    }

    #[test]
    fn country_code_is_upper_cased() {
        let record = BookingRecord { country: "usa".to_string(), ..Default::default() };
        let row = FeatureRow::from(&record);
        assert_eq!(row.get("country").and_then(Cell::as_text), Some("USA"));
    }

    #[test]
    fn json_object_keeps_scalars() {
        let input = json!({"hotel": "Resort Hotel", "adults": 2, "is_canceled": true});
        let row = FeatureRow::from_json_object(input.as_object().unwrap()).unwrap();
        assert_eq!(row.get("adults"), Some(&Cell::Number(2.0)));
        assert_eq!(row.get("is_canceled"), Some(&Cell::Number(1.0)));

        let nested = json!({"hotel": ["Resort Hotel"]});
        assert!(FeatureRow::from_json_object(nested.as_object().unwrap()).is_err());
    }
}

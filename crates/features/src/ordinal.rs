use adr_core::{Cell, FeatureRow, Weekday};

use crate::EncodeError;

pub const WEEKDAY_COLUMN: &str = "arrival_day_of_week";

/// Monday = 1 ... Sunday = 7. Only the canonical English names are accepted.
pub fn weekday_ordinal(label: &str) -> Result<u8, EncodeError> {
    label
        .parse::<Weekday>()
        .map(Weekday::ordinal)
        .map_err(|_| EncodeError::InvalidWeekday(label.to_string()))
}

/// Replace the weekday name in place with its ordinal. An absent column is left
/// for schema alignment to fill.
pub fn encode_weekday(row: &mut FeatureRow) -> Result<(), EncodeError> {
    let Some(cell) = row.remove(WEEKDAY_COLUMN) else {
        return Ok(());
    };
    let ordinal = match cell {
        Cell::Text(label) => weekday_ordinal(&label)?,
        Cell::Number(n) => return Err(EncodeError::InvalidWeekday(n.to_string())),
    };
    row.insert(WEEKDAY_COLUMN, ordinal);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_monday_through_sunday() {
        let names = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
        for (i, name) in names.iter().enumerate() {
            assert_eq!(weekday_ordinal(name).unwrap() as usize, i + 1);
        }
    }

    #[test]
    fn rejects_non_canonical_names() {
        for bad in ["Mon", "sunday", "Funday", ""] {
            assert_eq!(weekday_ordinal(bad), Err(EncodeError::InvalidWeekday(bad.to_string())));
        }
    }

    #[test]
    fn encodes_in_place() {
        let mut row = FeatureRow::new();
        row.insert(WEEKDAY_COLUMN, "Saturday");
        encode_weekday(&mut row).unwrap();
        assert_eq!(row.get(WEEKDAY_COLUMN), Some(&Cell::Number(6.0)));
    }

    #[test]
    fn absent_column_is_skipped() {
        let mut row = FeatureRow::new();
        encode_weekday(&mut row).unwrap();
        assert!(row.is_empty());
    }

    #[test]
    fn numeric_weekday_is_invalid() {
        let mut row = FeatureRow::new();
        row.insert(WEEKDAY_COLUMN, 3.0);
        assert!(matches!(encode_weekday(&mut row), Err(EncodeError::InvalidWeekday(_))));
    }
}

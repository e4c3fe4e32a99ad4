//! Incomplete one-hot expansion with a fixed reference level per field.
//!
//! The level lists are part of the trained model's schema: adding or renaming
//! one silently changes the feature layout.

use adr_core::{
    Cell, CustomerType, DepositType, DistributionChannel, FeatureRow, HotelType, MealPlan,
};

use crate::EncodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHotFamily {
    pub field: &'static str,
    /// Level represented by all flags being zero.
    pub reference: &'static str,
    pub levels: &'static [&'static str],
}

pub static ONE_HOT_FAMILIES: [OneHotFamily; 5] = [
    OneHotFamily {
        field: "hotel",
        reference: HotelType::City.label(),
        levels: &[HotelType::Resort.label()],
    },
    OneHotFamily {
        field: "meal",
        reference: MealPlan::BedAndBreakfast.label(),
        levels: &[
            MealPlan::FullBoard.label(),
            MealPlan::HalfBoard.label(),
            MealPlan::SelfCatering.label(),
            MealPlan::Undefined.label(),
        ],
    },
    OneHotFamily {
        field: "distribution_channel",
        reference: DistributionChannel::Corporate.label(),
        levels: &[
            DistributionChannel::Direct.label(),
            DistributionChannel::Gds.label(),
            DistributionChannel::TaTo.label(),
            DistributionChannel::Undefined.label(),
        ],
    },
    OneHotFamily {
        field: "deposit_type",
        reference: DepositType::NoDeposit.label(),
        levels: &[DepositType::NonRefund.label(), DepositType::Refundable.label()],
    },
    OneHotFamily {
        field: "customer_type",
        reference: CustomerType::Contract.label(),
        levels: &[
            CustomerType::Group.label(),
            CustomerType::Transient.label(),
            CustomerType::TransientParty.label(),
        ],
    },
];

impl OneHotFamily {
    pub fn column(&self, level: &str) -> String {
        format!("{}_{}", self.field, level)
    }

    pub fn columns(&self) -> impl Iterator<Item = String> + '_ {
        self.levels.iter().map(|level| self.column(level))
    }

    /// Drop the raw field and write one 0/1 flag per non-reference level.
    ///
    /// A label that is neither a level nor the reference yields all zeros.
    pub fn expand(&self, row: &mut FeatureRow) -> Result<(), EncodeError> {
        let cell = row.remove(self.field).ok_or_else(|| EncodeError::missing(self.field))?;
        let label = match &cell {
            Cell::Text(label) => label.as_str(),
            Cell::Number(n) => {
                return Err(EncodeError::schema_mismatch(
                    self.field,
                    format!("expected a category label, got {n}"),
                ))
            }
        };
        for level in self.levels {
            row.insert(self.column(level), label == *level);
        }
        Ok(())
    }
}
